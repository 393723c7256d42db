// ==========================================
// 藻类农场管理系统 - 时钟抽象
// ==========================================
// 默认日期(日报日期/作业日期/窗口截止)全部来自注入的时钟,
// 测试可用 FixedClock 给出确定性日期
// ==========================================

use chrono::{Duration, Local, NaiveDate, NaiveDateTime};
use std::sync::Mutex;

/// 时钟接口
pub trait Clock: Send + Sync {
    /// 当前本地时间
    fn now(&self) -> NaiveDateTime;

    /// 当天日期
    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

// ==========================================
// SystemClock - 系统本地时钟
// ==========================================
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

// ==========================================
// FixedClock - 可控时钟
// ==========================================
// step > 0 时每次 now() 后自动前进 step,
// 用于让连续入库的记录拥有严格递增的入库时间
#[derive(Debug)]
pub struct FixedClock {
    current: Mutex<NaiveDateTime>,
    step: Duration,
}

impl FixedClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            current: Mutex::new(now),
            step: Duration::zero(),
        }
    }

    /// 从日期创建(时间取 08:00:00)
    pub fn at_date(date: NaiveDate) -> Self {
        Self::new(date.and_hms_opt(8, 0, 0).unwrap_or_default())
    }

    pub fn with_step(mut self, step: Duration) -> Self {
        self.step = step;
        self
    }

    pub fn set(&self, now: NaiveDateTime) {
        if let Ok(mut guard) = self.current.lock() {
            *guard = now;
        }
    }

    pub fn advance(&self, delta: Duration) {
        if let Ok(mut guard) = self.current.lock() {
            *guard += delta;
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        match self.current.lock() {
            Ok(mut guard) => {
                let now = *guard;
                *guard += self.step;
                now
            }
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    fn today(&self) -> NaiveDate {
        match self.current.lock() {
            Ok(guard) => guard.date(),
            Err(poisoned) => poisoned.into_inner().date(),
        }
    }
}
