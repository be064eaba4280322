//! 카테고리 단위 알림 스로틀
//!
//! 이벤트 속도 제한과 별개로, 사용자 알림은 탐지기 식별자당 고정
//! 간격보다 촘촘하게 나가지 않습니다. 확인과 기록이 한 잠금 아래에서
//! 일어나므로 동시 호출이 같은 간격 안에서 두 번 통과할 수 없습니다.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// 탐지기 식별자별 마지막 알림 시각 원장
pub struct NotificationThrottle {
    /// 탐지기 id -> 마지막 알림 시각 (밀리초)
    last_alert: Mutex<HashMap<String, u64>>,
    /// 알림 간 최소 간격 (밀리초)
    window_ms: u64,
}

impl NotificationThrottle {
    /// 주어진 최소 간격으로 스로틀을 생성합니다.
    pub fn new(window_ms: u64) -> Self {
        Self {
            last_alert: Mutex::new(HashMap::new()),
            window_ms,
        }
    }

    /// 지금 알림을 보내도 되는지 확인하고, 허용되면 즉시 기록합니다.
    ///
    /// 원자적 확인-후-기록입니다. true가 반환되면 이번 알림 시각이
    /// 이미 원장에 기록된 상태이므로, 호출자는 별도의 기록 없이
    /// 알림을 보내면 됩니다.
    pub fn try_acquire(&self, detector_id: &str, now: u64) -> bool {
        let mut ledger = self
            .last_alert
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let allowed = match ledger.get(detector_id) {
            Some(&last) => now.saturating_sub(last) >= self.window_ms,
            None => true,
        };
        if allowed {
            ledger.insert(detector_id.to_owned(), now);
        }
        allowed
    }

    /// 설정된 최소 간격을 반환합니다.
    pub fn window_ms(&self) -> u64 {
        self.window_ms
    }
}
