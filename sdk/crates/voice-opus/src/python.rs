//! Python bindings, built with the `python` feature.

use pyo3::prelude::*;
use pyo3::types::PyBytes;

use voice_codec::AudioFormat;

use crate::config::{Application, CodecConfig};
use crate::{CodecError, OpusCodec, OpusDecoder, OpusEncoder, CODEC_ID};

fn to_py_err(err: CodecError) -> PyErr {
    if err.is_input_error() {
        PyErr::new::<pyo3::exceptions::PyValueError, _>(err.to_string())
    } else {
        PyErr::new::<pyo3::exceptions::PyRuntimeError, _>(err.to_string())
    }
}

/// Opus codec factory.
///
/// Holds the encoder configuration; hands out one encoder/decoder per stream.
#[pyclass(name = "OpusCodec", frozen)]
struct PyOpusCodec {
    inner: OpusCodec,
}

#[pymethods]
impl PyOpusCodec {
    /// Args:
    ///     application: "voip", "audio" or "low-delay"
    ///     fec: in-band forward error correction (always on for voip)
    ///     packet_loss: expected packet loss percentage, 0-100
    ///     sample_rate: PCM sample rate in Hz
    ///     channels: 1 or 2
    #[new]
    #[pyo3(signature = (
        application="voip",
        fec=true,
        packet_loss=10,
        sample_rate=voice_codec::AUDIO_SAMPLE_RATE,
        channels=voice_codec::AUDIO_CHANNELS
    ))]
    fn new(
        application: &str,
        fec: bool,
        packet_loss: u8,
        sample_rate: u32,
        channels: u16,
    ) -> PyResult<Self> {
        let application: Application = application
            .parse()
            .map_err(|e: crate::ParseApplicationError| {
                PyErr::new::<pyo3::exceptions::PyValueError, _>(e.to_string())
            })?;
        let config = CodecConfig::new(application, fec, packet_loss);
        Ok(PyOpusCodec {
            inner: OpusCodec::new(config).with_format(AudioFormat::new(sample_rate, channels)),
        })
    }

    #[getter]
    fn id(&self) -> u32 {
        CODEC_ID
    }

    #[getter]
    fn application(&self) -> &'static str {
        self.inner.config().application.as_str()
    }

    #[getter]
    fn fec(&self) -> bool {
        self.inner.config().fec
    }

    #[getter]
    fn packet_loss(&self) -> u8 {
        self.inner.config().packet_loss
    }

    fn new_encoder(&self) -> PyResult<PyEncoder> {
        let inner = self.inner.new_encoder().map_err(to_py_err)?;
        Ok(PyEncoder { inner })
    }

    fn new_decoder(&self) -> PyResult<PyDecoder> {
        let inner = self.inner.new_decoder().map_err(to_py_err)?;
        Ok(PyDecoder { inner })
    }
}

/// Opus encoder bound to the thread that created it.
#[pyclass(name = "Encoder", unsendable)]
struct PyEncoder {
    inner: OpusEncoder,
}

#[pymethods]
impl PyEncoder {
    #[getter]
    fn id(&self) -> u32 {
        CODEC_ID
    }

    /// Encode one frame of interleaved int16 PCM into an Opus packet.
    #[pyo3(signature = (pcm, frame_size, max_bytes=4000))]
    fn encode<'py>(
        &mut self,
        py: Python<'py>,
        pcm: Vec<i16>,
        frame_size: usize,
        max_bytes: usize,
    ) -> PyResult<Bound<'py, PyBytes>> {
        let packet = self
            .inner
            .encode(&pcm, frame_size, max_bytes)
            .map_err(to_py_err)?;
        Ok(PyBytes::new(py, &packet))
    }

    fn reset(&mut self) -> PyResult<()> {
        self.inner.reset().map_err(to_py_err)
    }

    /// Free the engine handle. Further calls raise RuntimeError.
    fn release(&mut self) {
        self.inner.release();
    }

    #[getter]
    fn released(&self) -> bool {
        self.inner.is_released()
    }

    /// In-band FEC flag currently active on the engine.
    fn fec(&mut self) -> PyResult<bool> {
        self.inner.fec().map_err(to_py_err)
    }

    fn set_fec(&mut self, enabled: bool) -> PyResult<()> {
        self.inner.set_fec(enabled).map_err(to_py_err)
    }

    /// Expected packet-loss percentage currently active on the engine.
    fn packet_loss(&mut self) -> PyResult<u8> {
        self.inner.packet_loss().map_err(to_py_err)
    }

    fn set_packet_loss(&mut self, percent: u8) -> PyResult<()> {
        self.inner.set_packet_loss(percent).map_err(to_py_err)
    }
}

/// Opus decoder bound to the thread that created it.
#[pyclass(name = "Decoder", unsendable)]
struct PyDecoder {
    inner: OpusDecoder,
}

#[pymethods]
impl PyDecoder {
    #[getter]
    fn id(&self) -> u32 {
        CODEC_ID
    }

    /// Decode one packet into interleaved int16 PCM. An empty packet yields
    /// concealment audio for a lost packet.
    fn decode(&mut self, data: &[u8], frame_size: usize) -> PyResult<Vec<i16>> {
        self.inner.decode(data, frame_size).map_err(to_py_err)
    }

    fn reset(&mut self) -> PyResult<()> {
        self.inner.reset().map_err(to_py_err)
    }

    fn release(&mut self) {
        self.inner.release();
    }

    #[getter]
    fn released(&self) -> bool {
        self.inner.is_released()
    }
}

/// Python module definition.
#[pymodule]
fn voice_opus(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // The host process may already have installed a subscriber.
    let _ = tracing_subscriber::fmt::try_init();
    m.add_class::<PyOpusCodec>()?;
    m.add_class::<PyEncoder>()?;
    m.add_class::<PyDecoder>()?;
    m.add("CODEC_ID", CODEC_ID)?;
    Ok(())
}
