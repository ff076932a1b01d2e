//! 语法树。

use std::fmt::Display;

use crate::utils::{Pos, Spanned};

/// 标识符
pub type Ident = Spanned<String>;

/// 排序表达式
#[derive(Debug, Clone, PartialEq)]
pub enum SortExpr {
    /// 排序名，例如 `Nat`
    Primary(Ident),
    /// 函数排序 `domain -> codomain`，右结合
    Arrow {
        /// 定义域
        domain: Domain,
        /// 值域
        codomain: Box<SortExpr>,
    },
    /// 容器排序 `List(S)`
    Param {
        /// 容器名
        container: Ident,
        /// 排序参数
        param: Ident,
    },
}

impl SortExpr {
    /// 元数：函数排序为定义域长度，其余为零。
    pub fn arity(&self) -> usize {
        match self {
            SortExpr::Arrow { domain, .. } => domain.arity(),
            _ => 0,
        }
    }
}

impl Display for SortExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortExpr::Primary(name) => write!(f, "{}", name),
            SortExpr::Arrow { domain, codomain } => write!(f, "{} -> {}", domain, codomain),
            SortExpr::Param { container, param } => write!(f, "{}({})", container, param),
        }
    }
}

/// `#` 连接的定义域，左结合
#[derive(Debug, Clone, PartialEq)]
pub struct Domain {
    /// 各位置，按源码顺序
    pub positions: Vec<DomainPosition>,
}

impl Domain {
    /// 位置个数。
    pub fn arity(&self) -> usize {
        self.positions.len()
    }
}

impl Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let positions = self
            .positions
            .iter()
            .map(|p| p.to_string())
            .collect::<Vec<_>>();
        write!(f, "{}", positions.join(" # "))
    }
}

/// 定义域中的一个位置
#[derive(Debug, Clone, PartialEq)]
pub struct DomainPosition {
    /// 排序
    pub sort: SortExpr,
    /// 字段标签，用于生成投影函数
    pub label: Option<Ident>,
}

impl Display for DomainPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.sort {
            SortExpr::Arrow { .. } => write!(f, "({})", self.sort)?,
            sort => write!(f, "{}", sort)?,
        }
        if let Some(label) = &self.label {
            write!(f, " <\"{}\">", label)?;
        }
        Ok(())
    }
}

/// 约束符
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinderKind {
    /// `lambda`
    Lambda,
    /// `forall`
    Forall,
    /// `exists`
    Exists,
}

impl BinderKind {
    /// 关键字。
    pub fn keyword(self) -> &'static str {
        match self {
            BinderKind::Lambda => "lambda",
            BinderKind::Forall => "forall",
            BinderKind::Exists => "exists",
        }
    }
}

/// 数据表达式
#[derive(Debug, Clone, PartialEq)]
pub enum DataExpr {
    /// 函数符号或变量
    Ident(Ident),
    /// 应用 `head(args)`
    Application {
        /// 被应用的表达式
        head: Box<DataExpr>,
        /// 参数列表
        args: Vec<DataExpr>,
    },
    /// 约束表达式，恰好约束一个变量
    Binder {
        /// 约束符
        kind: BinderKind,
        /// 约束变量
        var: VarDecl,
        /// 体
        body: Box<DataExpr>,
    },
}

impl DataExpr {
    /// 表达式的位置。
    pub fn pos(&self) -> Pos {
        match self {
            DataExpr::Ident(name) => name.pos,
            DataExpr::Application { head, args } => args
                .iter()
                .map(DataExpr::pos)
                .fold(head.pos(), Pos::join),
            DataExpr::Binder { var, body, .. } => var.name.pos.join(body.pos()),
        }
    }
}

impl Display for DataExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataExpr::Ident(name) => write!(f, "{}", name),
            DataExpr::Application { head, args } => {
                let args = args.iter().map(|a| a.to_string()).collect::<Vec<_>>();
                match head.as_ref() {
                    DataExpr::Ident(_) | DataExpr::Application { .. } => {
                        write!(f, "{}({})", head, args.join(", "))
                    }
                    DataExpr::Binder { .. } => write!(f, "({})({})", head, args.join(", ")),
                }
            }
            DataExpr::Binder { kind, var, body } => {
                write!(f, "{}({}, {})", kind.keyword(), var, body)
            }
        }
    }
}

/// 排序声明
#[derive(Debug, Clone, PartialEq)]
pub struct SortDecl {
    /// 完整名称
    pub name: Ident,
    /// 容器排序的形式参数
    pub param: Option<Ident>,
    /// 生成代码中使用的短标签
    pub label: Ident,
}

impl Display for SortDecl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.param {
            Some(param) => write!(f, "{}({}) <\"{}\">", self.name, param, self.label),
            None => write!(f, "{} <\"{}\">", self.name, self.label),
        }
    }
}

/// 函数声明的种类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    /// `cons`
    Constructor,
    /// `map`
    Mapping,
}

/// 函数声明
#[derive(Debug, Clone, PartialEq)]
pub struct OpDecl {
    /// 种类
    pub kind: OpKind,
    /// 完整名称
    pub name: Ident,
    /// 短标签
    pub label: Ident,
    /// 签名
    pub sort: SortExpr,
}

impl OpDecl {
    /// 声明的元数。
    pub fn arity(&self) -> usize {
        self.sort.arity()
    }
}

impl Display for OpDecl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} <\"{}\"> : {}", self.name, self.label, self.sort)
    }
}

/// 变量声明
#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    /// 变量名
    pub name: Ident,
    /// 排序
    pub sort: SortExpr,
}

impl Display for VarDecl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.name, self.sort)
    }
}

/// 方程 `condition -> lhs = rhs`
#[derive(Debug, Clone, PartialEq)]
pub struct Equation {
    /// 条件，省略时为 `true`
    pub condition: DataExpr,
    /// 左边
    pub lhs: DataExpr,
    /// 右边
    pub rhs: DataExpr,
}

impl Display for Equation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {} = {}", self.condition, self.lhs, self.rhs)
    }
}

/// `#include` 指令
#[derive(Debug, Clone, PartialEq)]
pub struct Include {
    /// 文件路径，已去掉引号
    pub path: Ident,
}

/// 一个文件的规约
#[derive(Debug, Clone, PartialEq)]
pub struct Specification {
    /// 包含的文件
    pub includes: Vec<Include>,
    /// 排序声明，第一个为主排序
    pub sorts: Vec<SortDecl>,
    /// 构造子
    pub constructors: Vec<OpDecl>,
    /// 映射
    pub mappings: Vec<OpDecl>,
    /// 变量
    pub variables: Vec<VarDecl>,
    /// 方程
    pub equations: Vec<Equation>,
}

impl Specification {
    /// 主排序，即第一个排序声明。
    pub fn principal_sort(&self) -> &SortDecl {
        &self.sorts[0]
    }

    /// 所有函数声明，构造子在前。
    pub fn functions(&self) -> impl Iterator<Item = &OpDecl> {
        self.constructors.iter().chain(self.mappings.iter())
    }
}

impl Display for Specification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for include in &self.includes {
            writeln!(f, "#include {}", include.path)?;
        }
        writeln!(f, "sort")?;
        for sort in &self.sorts {
            writeln!(f, "  {};", sort)?;
        }
        for (keyword, ops) in [("cons", &self.constructors), ("map", &self.mappings)] {
            if !ops.is_empty() {
                writeln!(f, "{}", keyword)?;
                for op in ops {
                    writeln!(f, "  {};", op)?;
                }
            }
        }
        if !self.variables.is_empty() {
            writeln!(f, "var")?;
            for var in &self.variables {
                writeln!(f, "  {};", var)?;
            }
        }
        if !self.equations.is_empty() {
            writeln!(f, "eqn")?;
            for equation in &self.equations {
                writeln!(f, "  {};", equation)?;
            }
        }
        Ok(())
    }
}
