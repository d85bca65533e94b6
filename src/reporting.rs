//! # Reporting Module / 报告模块
//!
//! This module handles the display of batch results. It prints colorful,
//! formatted summaries to the console and can write a standalone HTML report,
//! both with internationalization support.
//!
//! 此模块处理批次结果的展示。它在控制台打印彩色格式化摘要，
//! 并可生成独立的 HTML 报告，两者均支持国际化。

pub mod console;
pub mod html;

// Re-export common reporting functions
pub use console::{print_run_summary, print_upload_summary};
pub use html::generate_html_report;
