//! (패키지, 종류) 단위 슬라이딩 윈도우 속도 제한
//!
//! [`EventRateLimiter`]는 탐지기당 하나씩 존재하며, (패키지, 종류)
//! 키별 마지막 방출 시각을 추적합니다. 윈도우는 모든 탐지기가 공유하는
//! [`RateWindow`]에서 결정 시점마다 읽으므로, 외부 설정 변경이 이후의
//! 모든 결정에 즉시 반영됩니다.
//!
//! 호출 규약: `should_emit`을 먼저 평가하고, 실제로 방출할 때만
//! `record`를 호출합니다. 억제된 이벤트는 윈도우를 리셋하지 않으므로
//! 키당 윈도우마다 최대 한 번 방출하는 게이트가 됩니다(발생할 때마다
//! 미루는 디바운스가 아닙니다).

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use accesswatch_core::types::EventKind;

/// 모든 탐지기가 공유하는 속도 제한 윈도우 (밀리초)
///
/// 복제는 같은 윈도우를 가리키는 핸들을 만듭니다. 변경은 이후의
/// 모든 `should_emit` 결정에 즉시 적용됩니다.
#[derive(Clone)]
pub struct RateWindow {
    ms: Arc<AtomicU64>,
}

impl RateWindow {
    /// 주어진 윈도우(밀리초)로 생성합니다.
    pub fn new(ms: u64) -> Self {
        Self {
            ms: Arc::new(AtomicU64::new(ms)),
        }
    }

    /// 현재 윈도우를 읽습니다.
    pub fn get(&self) -> u64 {
        self.ms.load(Ordering::Relaxed)
    }

    /// 윈도우를 갱신합니다.
    pub fn set(&self, ms: u64) {
        self.ms.store(ms, Ordering::Relaxed);
    }
}

/// 프로세스 기동 기준 단조 시계
///
/// 밀리초 단위 경과 시간을 반환합니다. 벽시계 조정의 영향을 받지
/// 않습니다.
#[derive(Clone)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    /// 현재 시점을 원점으로 하는 시계를 생성합니다.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    /// 원점 이후 경과한 밀리초를 반환합니다.
    pub fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

/// (패키지, 종류) 단위 마지막 방출 시각 테이블
///
/// 항목은 패키지별 첫 이벤트에서 지연 생성되며, `record`마다
/// 기회적으로 정리됩니다. 프로세스 재시작 시 유지되지 않습니다.
pub struct EventRateLimiter {
    /// 패키지 -> (종류 -> 마지막 방출 시각 ms)
    last_seen: Mutex<HashMap<String, HashMap<EventKind, u64>>>,
    window: RateWindow,
}

impl EventRateLimiter {
    /// 공유 윈도우 핸들로 제한기를 생성합니다.
    pub fn new(window: RateWindow) -> Self {
        Self {
            last_seen: Mutex::new(HashMap::new()),
            window,
        }
    }

    /// (패키지, 종류)에 대해 지금 방출해도 되는지 판단합니다.
    ///
    /// 이전 기록이 없거나, 마지막 기록 이후 현재 윈도우 이상
    /// 경과했으면 true입니다. 상태를 변경하지 않습니다.
    pub fn should_emit(&self, package: &str, kind: EventKind, now: u64) -> bool {
        let window = self.window.get();
        let table = self
            .last_seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        match table.get(package).and_then(|kinds| kinds.get(&kind)) {
            Some(&last) => now.saturating_sub(last) >= window,
            None => true,
        }
    }

    /// (패키지, 종류)의 방출 시각을 기록하고 오래된 항목을 정리합니다.
    ///
    /// `now - 2×윈도우`보다 오래된 모든 항목을 제거하고, 종류 맵이
    /// 빈 패키지 항목도 함께 제거합니다. 윈도우의 2배를 쓰는 이유는
    /// 곧 다시 자격을 얻을 항목이 동시 읽기 중에 섣불리 버려지지
    /// 않게 하기 위해서입니다.
    pub fn record(&self, package: &str, kind: EventKind, now: u64) {
        let horizon = now.saturating_sub(self.window.get().saturating_mul(2));
        let mut table = self
            .last_seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        table
            .entry(package.to_owned())
            .or_default()
            .insert(kind, now);
        table.retain(|_, kinds| {
            kinds.retain(|_, &mut last| last >= horizon);
            !kinds.is_empty()
        });
    }

    /// 현재 추적 중인 (패키지, 종류) 항목 수를 반환합니다.
    pub fn tracked_entries(&self) -> usize {
        let table = self
            .last_seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        table.values().map(HashMap::len).sum()
    }
}
