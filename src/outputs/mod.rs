//! Terminal rendering of the ranking.
//!
//! - [`chart`]: checkbox panel and stacked horizontal bar chart
//!
//! ```text
//! 웹사이트별 한국 트렌드 분석
//!
//!  [x] 1 █ 네이버뉴스   [x] 2 ▓ 조선일보
//!
//! 키워드        빈도
//! 정치      ██████████████▓▓▓▓▓▓ 7
//! 스포츠    ▓▓▓▓▓▓▓▓▓▓▓ 4
//! ```

pub mod chart;
