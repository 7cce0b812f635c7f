// ==========================================
// 药品库存再分配系统 - 进度通知
// ==========================================
// 职责: 定义进度观察者 trait，引擎每处理完一条记录同步回调一次
// 说明: 取值 0..=100，单调不减，最后一次回调为 100
// ==========================================

/// 进度观察者
pub trait ProgressObserver {
    /// 接收当前进度百分比
    fn on_progress(&mut self, percent: u8);
}

impl<F: FnMut(u8)> ProgressObserver for F {
    fn on_progress(&mut self, percent: u8) {
        self(percent)
    }
}

/// 空操作观察者
///
/// 用于不关心进度的场景（如单元测试、批处理）
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpProgress;

impl ProgressObserver for NoOpProgress {
    fn on_progress(&mut self, _percent: u8) {}
}

/// 进度计数器: floor(processed / total * 100)
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    total: usize,
    processed: usize,
}

impl ProgressTracker {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            processed: 0,
        }
    }

    /// 记录处理完一条，返回最新百分比
    pub fn advance(&mut self) -> u8 {
        self.processed = (self.processed + 1).min(self.total);
        self.percent()
    }

    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        // 整数运算避免浮点误差（如 29/100 → 28）
        (self.processed * 100 / self.total) as u8
    }
}
