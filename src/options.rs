//! 编译选项。

/// 编译选项。
#[derive(Clone, Debug)]
pub struct Options {
    /// 报告每个被编译或跳过的文件。
    pub verbose: bool,
    /// 输出每个文件的词法单元与语法树。
    pub debug: bool,
    /// 彩色输出诊断与跟踪信息。
    pub color: bool,
    /// 生成代码中库头文件的路径前缀，同时决定头文件保护宏与外层命名空间。
    pub include_prefix: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            verbose: false,
            debug: false,
            color: true,
            include_prefix: "mcrl2/data".to_string(),
        }
    }
}

impl Options {
    /// 路径前缀的各段，例如 `mcrl2/data` 得到 `["mcrl2", "data"]`。
    pub fn namespaces(&self) -> Vec<&str> {
        self.include_prefix
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect()
    }

    /// 头文件保护宏的前缀，例如 `MCRL2_DATA`。
    pub fn guard_prefix(&self) -> String {
        self.namespaces()
            .iter()
            .map(|segment| segment.to_uppercase())
            .collect::<Vec<_>>()
            .join("_")
    }
}
