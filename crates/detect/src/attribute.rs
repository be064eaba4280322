//! 패키지 귀속 휴리스틱
//!
//! 로그 라인에서 접근 주체로 추정되는 패키지 이름을 뽑아냅니다.
//! 네 가지 전략을 고정된 순서로 시도하고 첫 성공에서 반환합니다:
//!
//! 1. 위치 기반 토큰 스캔 -- 구조화된 로그에서 싸고 대체로 정확
//! 2. `uid=<digits> ... package=<name>` 명시적 키-값 패턴
//! 3. `uid=<digits>` 단독 매치 후 주입된 리졸버로 UID 조회
//! 4. 라인 전체에서 점으로 구분된 식별자 모양 토큰 탐색 (최후 수단)
//!
//! 어떤 전략도 성공하지 못하면 `"unknown"` 센티널을 반환합니다.
//! 반환값은 항상 존재합니다. 마지막 전략은 패키지처럼 보이는 무관한
//! 토큰에 귀속될 수 있는 휴리스틱 한계를 갖습니다.

use std::sync::Arc;

use regex::Regex;
use tracing::debug;

use accesswatch_core::pipeline::UidResolver;

use crate::error::DetectError;

/// 귀속 실패 센티널
pub const UNKNOWN_PACKAGE: &str = "unknown";

/// 패키지 귀속기
///
/// 구성 시 정규식을 한 번 컴파일하며, 이후 불변이므로 여러 탐지기가
/// `Arc`로 공유하며 동시에 호출할 수 있습니다.
pub struct PackageAttributor {
    /// `uid=<digits> ... package=<name>` 패턴
    uid_pkg: Regex,
    /// `uid=<digits>` 단독 패턴
    uid_only: Regex,
    /// 점으로 구분된 식별자 모양 (부분 탐색용)
    any_pkg: Regex,
    /// 점으로 구분된 식별자 모양 (토큰 전체 매치용)
    token_pkg: Regex,
    /// UID -> 패키지 조회 능력 (선택적 주입)
    resolver: Option<Arc<dyn UidResolver>>,
}

impl PackageAttributor {
    /// 리졸버 없이 귀속기를 생성합니다. 전략 3은 항상 건너뜁니다.
    pub fn new() -> Result<Self, DetectError> {
        Self::with_resolver(None)
    }

    /// 선택적 UID 리졸버와 함께 귀속기를 생성합니다.
    pub fn with_resolver(resolver: Option<Arc<dyn UidResolver>>) -> Result<Self, DetectError> {
        const DOTTED: &str = r"[A-Za-z]\w*(?:\.[A-Za-z]\w*)+";
        Ok(Self {
            uid_pkg: Regex::new(r"uid=(\d+).*?package=([\w.]+)")?,
            uid_only: Regex::new(r"uid=(\d+)")?,
            any_pkg: Regex::new(DOTTED)?,
            token_pkg: Regex::new(&format!("^{DOTTED}$"))?,
            resolver,
        })
    }

    /// 라인에서 책임 패키지를 추정합니다.
    ///
    /// 전략을 순서대로 시도하고 첫 성공을 반환합니다. 실패 시
    /// [`UNKNOWN_PACKAGE`]를 반환하며, 결코 비지 않습니다.
    pub fn attribute(&self, line: &str) -> String {
        if let Some(pkg) = self.scan_columns(line) {
            return pkg;
        }
        if let Some(pkg) = self.match_uid_package(line) {
            return pkg;
        }
        if let Some(pkg) = self.resolve_uid(line) {
            return pkg;
        }
        if let Some(pkg) = self.scan_anywhere(line) {
            return pkg;
        }
        UNKNOWN_PACKAGE.to_owned()
    }

    /// 전략 1: 위치 기반 토큰 스캔
    ///
    /// 처음 세 컬럼(타임스탬프/레벨/태그로 가정)을 건너뛰고 토큰을
    /// 스캔합니다. 한 글자 토큰은 종료 마커로 취급합니다. 컬럼이
    /// 충분히 많은 구조화된 라인에서만 동작합니다.
    fn scan_columns(&self, line: &str) -> Option<String> {
        let cols: Vec<&str> = line.split_whitespace().collect();
        if cols.len() <= 5 {
            return None;
        }
        for col in &cols[3..] {
            if col.chars().count() == 1 {
                break;
            }
            let token = col.replace("...", "").replace('…', "");
            if self.token_pkg.is_match(&token) {
                return Some(token);
            }
        }
        None
    }

    /// 전략 2: `uid=<digits> ... package=<name>` 명시적 패턴
    fn match_uid_package(&self, line: &str) -> Option<String> {
        self.uid_pkg
            .captures(line)
            .and_then(|caps| caps.get(2))
            .map(|m| m.as_str().to_owned())
    }

    /// 전략 3: UID 단독 매치 후 리졸버 조회
    ///
    /// 조회 실패와 빈 결과는 삼키고 다음 전략으로 넘어갑니다.
    fn resolve_uid(&self, line: &str) -> Option<String> {
        let resolver = self.resolver.as_ref()?;
        let uid: u32 = self
            .uid_only
            .captures(line)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse().ok())?;
        match resolver.packages_for_uid(uid) {
            Ok(packages) => packages.into_iter().next(),
            Err(e) => {
                debug!(uid, error = %e, "uid resolution failed, falling through");
                None
            }
        }
    }

    /// 전략 4: 라인 전체에서 점으로 구분된 식별자 탐색
    fn scan_anywhere(&self, line: &str) -> Option<String> {
        self.any_pkg.find(line).map(|m| m.as_str().to_owned())
    }
}
