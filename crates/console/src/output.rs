use std::fmt::Display;
use std::io::Write;
use std::sync::{Arc, Mutex};
use tracing::warn;

/// # Summary
/// 线程安全的文本输出端，控制台适配器共用。
///
/// # Invariants
/// - 写入失败只记录日志，不向调用方传播（端口方法没有返回值）。
pub struct Output {
    inner: Mutex<Box<dyn Write + Send>>,
}

impl Output {
    pub fn new(writer: impl Write + Send + 'static) -> Self {
        Self {
            inner: Mutex::new(Box::new(writer)),
        }
    }

    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }

    /// 写入一行并立即刷新。
    pub fn line(&self, text: impl Display) {
        let mut w = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if let Err(e) = writeln!(w, "{}", text).and_then(|_| w.flush()) {
            warn!("console write failed: {}", e);
        }
    }
}

/// # Summary
/// 可克隆的内存缓冲区，便于检查控制台输出。
#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以 UTF-8 文本返回已写入的内容。
    pub fn contents(&self) -> String {
        let buf = self.0.lock().unwrap_or_else(|e| e.into_inner());
        String::from_utf8_lossy(&buf).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, data: &[u8]) -> std::io::Result<usize> {
        self.0
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
