//! 编译错误。

use std::path::PathBuf;

use annotate_snippets::{
    display_list::{DisplayList, FormatOptions},
    snippet::{Annotation, AnnotationType, Snippet},
};
use thiserror::Error;

use crate::utils::{LinesInfo, Pos};

/// 单个源文件内、带位置的错误。
#[allow(missing_docs)]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SourceError {
    #[error("expected {expected}, found {found}")]
    Syntax {
        expected: String,
        found: String,
        pos: Pos,
    },

    #[error("unresolved symbol `{name}`")]
    UnresolvedSymbol { name: String, pos: Pos },

    #[error("unresolved sort `{name}`")]
    UnresolvedSort { name: String, pos: Pos },
}

impl SourceError {
    /// 出错位置。
    pub fn pos(&self) -> Pos {
        match self {
            SourceError::Syntax { pos, .. }
            | SourceError::UnresolvedSymbol { pos, .. }
            | SourceError::UnresolvedSort { pos, .. } => *pos,
        }
    }

    fn title(&self) -> &'static str {
        match self {
            SourceError::Syntax { .. } => "syntax error",
            SourceError::UnresolvedSymbol { .. } | SourceError::UnresolvedSort { .. } => {
                "semantic error"
            }
        }
    }

    /// 渲染为带源码标注的诊断信息。
    pub fn to_snippet(&self, filename: &str, source: &str, color: bool) -> String {
        let message = self.to_string();
        let slices = match LinesInfo::locate(filename, source, self.pos()) {
            Some(lines) => vec![lines.as_annotation(&message, AnnotationType::Error)],
            None => vec![],
        };

        let snippet = Snippet {
            title: Some(Annotation {
                id: None,
                label: Some(self.title()),
                annotation_type: AnnotationType::Error,
            }),
            footer: vec![],
            slices,
            opt: FormatOptions {
                color,
                ..Default::default()
            },
        };

        DisplayList::from(snippet).to_string()
    }
}

/// 编译一次运行中的错误。
#[allow(missing_docs)]
#[derive(Error, Debug)]
pub enum Error {
    #[error("cannot read `{}`", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("include cycle: {}", .chain.iter().map(|p| p.display().to_string()).collect::<Vec<_>>().join(" -> "))]
    IncludeCycle { chain: Vec<PathBuf> },

    #[error("{snippet}")]
    Source {
        path: PathBuf,
        #[source]
        error: SourceError,
        snippet: String,
    },
}

impl Error {
    /// 源文件内的错误（如果有）。
    pub fn source_error(&self) -> Option<&SourceError> {
        match self {
            Error::Source { error, .. } => Some(error),
            _ => None,
        }
    }
}
