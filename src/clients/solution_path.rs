//! 题解文件路径与提交信息推导
//!
//! 路径规则：标题去掉字母/数字/空白以外的字符，空白压缩为下划线，
//! 扩展名按语言标签查固定映射表（未知语言落到 txt）。

use crate::models::Submission;
use phf::phf_map;

/// 语言标签 → 文件扩展名（全映射，未知标签统一回退 txt）
static EXTENSION_MAP: phf::Map<&'static str, &'static str> = phf_map! {
    "cpp" => "cpp",
    "c" => "c",
    "java" => "java",
    "python" => "py",
    "python3" => "py",
    "javascript" => "js",
    "typescript" => "ts",
    "csharp" => "cs",
    "golang" => "go",
    "rust" => "rs",
};

/// 标题转文件名：只保留字母、数字、空白，空白段压缩为单个下划线
pub fn format_file_name(title: &str) -> String {
    let cleaned: String = title
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
        .collect();

    cleaned.split_whitespace().collect::<Vec<_>>().join("_")
}

/// 语言标签对应的扩展名（大小写不敏感）
pub fn file_extension(language: &str) -> &'static str {
    EXTENSION_MAP
        .get(language.to_lowercase().as_str())
        .copied()
        .unwrap_or("txt")
}

/// 仓库内的完整文件路径，如 `solution/Two_Sum.js`
pub fn build_path(solution_dir: &str, title: &str, language: &str) -> String {
    format!(
        "{}/{}.{}",
        solution_dir.trim_end_matches('/'),
        format_file_name(title),
        file_extension(language)
    )
}

/// 提交信息：标题 + 可选的耗时/内存统计
pub fn build_commit_message(submission: &Submission) -> String {
    let mut message = format!("Add solution for {}", submission.title);

    match (&submission.time, &submission.memory) {
        (Some(time), Some(memory)) => {
            message.push_str(&format!(" | {} | {}", time, memory));
        }
        (Some(time), None) => {
            message.push_str(&format!(" | {}", time));
        }
        (None, Some(memory)) => {
            message.push_str(&format!(" | {}", memory));
        }
        (None, None) => {}
    }

    message
}
