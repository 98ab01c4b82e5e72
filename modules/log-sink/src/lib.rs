use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{debug, info};
use log_sink_api::{install_sink, LogSink, LOG_SINK_SERVICE_ID};
use vgof_core::{KernelError, KernelResult, Module, ServiceRegistry};

/// Sink that keeps lines in memory until flushed.
pub struct BufferedSink<W: Write + Send> {
    pending: Mutex<Vec<String>>,
    out: Mutex<W>,
}

impl BufferedSink<io::Stderr> {
    pub fn stderr() -> Self {
        Self::with_writer(io::stderr())
    }
}

impl<W: Write + Send> BufferedSink<W> {
    pub fn with_writer(out: W) -> Self {
        Self {
            pending: Mutex::new(Vec::new()),
            out: Mutex::new(out),
        }
    }

    pub fn pending(&self) -> usize {
        lock(&self.pending).len()
    }

    /// Hand back the writer, flushing first.
    pub fn into_writer(self) -> io::Result<W> {
        self.flush()?;
        Ok(self.out.into_inner().unwrap_or_else(PoisonError::into_inner))
    }
}

impl<W: Write + Send> LogSink for BufferedSink<W> {
    fn write_line(&self, line: &str) {
        lock(&self.pending).push(line.to_string());
    }

    fn flush(&self) -> io::Result<()> {
        let lines = std::mem::take(&mut *lock(&self.pending));
        let mut out = lock(&self.out);
        for line in &lines {
            writeln!(out, "{}", line)?;
        }
        out.flush()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Installs a [`BufferedSink`] on stderr and flushes it on stop.
#[derive(Default)]
pub struct LogSinkModule {
    sink: Option<Arc<dyn LogSink>>,
}

impl LogSinkModule {
    /// Module that installs `sink` instead of a stderr sink.
    pub fn with_sink(sink: Arc<dyn LogSink>) -> Self {
        Self { sink: Some(sink) }
    }
}

impl Module for LogSinkModule {
    fn name(&self) -> &str {
        "log-sink"
    }

    fn check_depend(&self, _registry: &ServiceRegistry) -> bool {
        true
    }

    fn start(&mut self, registry: &ServiceRegistry) -> KernelResult<bool> {
        let sink = self
            .sink
            .get_or_insert_with(|| Arc::new(BufferedSink::stderr()) as Arc<dyn LogSink>)
            .clone();
        install_sink(registry, sink)?;
        info!("Log sink installed as {}", LOG_SINK_SERVICE_ID);
        Ok(true)
    }

    fn stop(&mut self, registry: &ServiceRegistry) -> KernelResult<()> {
        registry.uninstall(&[LOG_SINK_SERVICE_ID]);
        if let Some(sink) = self.sink.take() {
            debug!("Flushing log sink");
            sink.flush()
                .map_err(|e| KernelError::Other(format!("log sink flush failed: {}", e)))?;
        }
        Ok(())
    }
}

vgof_core::declare_module!(LogSinkModule, LogSinkModule::default);
