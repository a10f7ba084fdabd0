use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::utils::consts::PROGRESS_UPDATE_INTERVAL_MS;

pub struct ProgressManager {
    mp: MultiProgress,
    bars: Arc<Mutex<HashMap<String, ProgressBar>>>,
}

impl ProgressManager {
    pub fn new() -> Self {
        Self {
            mp: MultiProgress::new(),
            bars: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// 创建新的进度条，返回可交给 sink 的句柄
    /// - `id`: 进度条唯一标识
    /// - `total`: 总进度值
    /// - `template`: 进度条模板
    /// - `message`: 初始消息
    pub fn create_bar(
        &self,
        id: &str,
        total: u64,
        template: &str,
        message: &str,
    ) -> Result<ProgressBar, String> {
        let style = ProgressStyle::default_bar()
            .template(template)
            .map_err(|e| format!("Template error: {}", e))?
            .progress_chars("█▉▊▋▌▍▎▏ ");
        self.insert(id, ProgressBar::new(total), style, message)
    }

    /// 创建旋转指示器（发送中）
    pub fn create_spinner(&self, id: &str, message: &str) -> Result<ProgressBar, String> {
        let style = ProgressStyle::default_spinner()
            .template(templates::TX_SPINNER)
            .map_err(|e| format!("Template error: {}", e))?;
        let pb = self.insert(id, ProgressBar::new_spinner(), style, message)?;
        pb.enable_steady_tick(Duration::from_millis(PROGRESS_UPDATE_INTERVAL_MS));
        Ok(pb)
    }

    fn insert(
        &self,
        id: &str,
        pb: ProgressBar,
        style: ProgressStyle,
        message: &str,
    ) -> Result<ProgressBar, String> {
        let mut bars = self
            .bars
            .lock()
            .map_err(|e| format!("Lock error: {}", e))?;

        if bars.contains_key(id) {
            return Err(format!("Progress bar '{}' already exists", id));
        }

        let pb = self.mp.add(pb);
        pb.set_style(style);
        pb.set_message(message.to_string());

        bars.insert(id.to_string(), pb.clone());
        Ok(pb)
    }

    /// 完成并清理进度条
    pub fn finish_and_clear(&self, id: &str) -> Result<(), String> {
        let mut bars = self
            .bars
            .lock()
            .map_err(|e| format!("Lock error: {}", e))?;
        if let Some(pb) = bars.remove(id) {
            pb.finish_and_clear();
            Ok(())
        } else {
            Err(format!("Progress bar '{}' not found", id))
        }
    }

    /// 检查进度条是否存在
    pub fn exists(&self, id: &str) -> bool {
        if let Ok(bars) = self.bars.lock() {
            bars.contains_key(id)
        } else {
            false
        }
    }

    /// 清理所有进度条
    pub fn clear_all(&self) {
        if let Ok(mut bars) = self.bars.lock() {
            for (_, pb) in bars.drain() {
                pb.finish_and_clear();
            }
        }
    }
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

pub mod templates {
    pub const WRITE: &str =
        "WRITE [{bar:30.cyan}] {percent}% ({pos}/{len} samples) {msg}";
    pub const TX_SPINNER: &str = "{spinner:.blue} TX {msg}";
}
