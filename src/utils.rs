//! 位置信息与跟踪输出。

use std::{fmt::Display, ops::Deref};

use annotate_snippets::snippet::{AnnotationType, Slice, SourceAnnotation};
use colorized::{Color, Colors};

/// 源文件中的字节区间
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pos {
    /// 起始字节
    pub start: usize,
    /// 结束字节（不含）
    pub end: usize,
}

impl Pos {
    /// 创建一个新的 `Pos`。
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// 从 pest 的区间创建。
    pub fn from_pest(span: pest::Span<'_>) -> Self {
        Self::new(span.start(), span.end())
    }

    /// 覆盖两个区间的最小区间。
    pub fn join(self, other: Pos) -> Self {
        Self::new(self.start.min(other.start), self.end.max(other.end))
    }
}

/// 带位置信息的值
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    inner: T,
    /// 位置
    pub pos: Pos,
}

impl<T: Display> Display for Spanned<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.inner.fmt(f)
    }
}

impl<T> Deref for Spanned<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<T> Spanned<T> {
    /// 创建一个新的 `Spanned`。
    pub fn new(inner: T, pos: Pos) -> Self {
        Self { inner, pos }
    }
}

/// 所在行的信息
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LinesInfo<'a> {
    /// 文件名
    pub filename: &'a str,
    /// 包含区间的某几行
    pub source: &'a str,
    /// 起始行号
    pub line_start: usize,
    /// 区间在 source 中的切片
    pub range: (usize, usize),
}

impl<'a> LinesInfo<'a> {
    /// 找出 `pos` 所在的行。源文件为空时返回 `None`。
    pub fn locate(filename: &'a str, source: &'a str, pos: Pos) -> Option<Self> {
        if source.is_empty() {
            return None;
        }
        let start = pos.start.min(source.len());
        let end = pos.end.clamp(start, source.len());

        let line_begin = source[..start].rfind('\n').map_or(0, |i| i + 1);
        let line_end = source[end..].find('\n').map_or(source.len(), |i| end + i);
        let line_start = source[..line_begin].matches('\n').count() + 1;

        Some(LinesInfo {
            filename,
            source: &source[line_begin..line_end],
            line_start,
            range: (start - line_begin, end - line_begin),
        })
    }

    /// 转换为带标注的代码片段。
    pub fn as_annotation(&self, message: &'a str, annotation_type: AnnotationType) -> Slice<'a> {
        Slice {
            source: self.source,
            line_start: self.line_start,
            origin: Some(self.filename),
            annotations: vec![SourceAnnotation {
                range: self.range,
                label: message,
                annotation_type,
            }],
            fold: true,
        }
    }
}

/// 在标准错误上输出一行跟踪信息。
pub(crate) fn trace(color: bool, tag: &str, colors: Colors, message: impl Display) {
    if color {
        eprintln!("{} {}", tag.color(colors), message);
    } else {
        eprintln!("{} {}", tag, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locate_second_line() {
        let source = "sort Bool <\"bool_\">;\ncons true <\"true_\"> : Bool;\n";
        let start = source.find("true").unwrap();
        let info = LinesInfo::locate("bool.spec", source, Pos::new(start, start + 4)).unwrap();
        assert_eq!(info.line_start, 2);
        assert_eq!(info.source, "cons true <\"true_\"> : Bool;");
        assert_eq!(info.range, (5, 9));
    }

    #[test]
    fn locate_in_empty_source() {
        assert!(LinesInfo::locate("empty.spec", "", Pos::new(0, 0)).is_none());
    }

    #[test]
    fn join_covers_both() {
        assert_eq!(Pos::new(4, 6).join(Pos::new(1, 3)), Pos::new(1, 6));
    }
}
