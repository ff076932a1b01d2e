//! 语义分析。
//!
//! [`Symbols`] 是整个运行期间累积的符号表，只追加不回滚；[`Scope`] 是编译单个文件时
//! 的查找视图，先查当前文件，再查已编译的文件。

use std::{
    collections::{BTreeSet, HashMap},
    path::{Path, PathBuf},
};

use crate::frontend::ast::{DataExpr, OpDecl, SortDecl, SortExpr, Specification};

pub mod params;
pub mod projection;
pub mod resolve;

pub use projection::collect_projections;
pub use resolve::{Resolved, Variables};

/// 已编译文件中的声明
#[derive(Debug, Default)]
pub struct Symbols {
    sorts: Vec<SortDecl>,
    functions: Vec<OpDecl>,
    operator_labels: HashMap<String, String>,
    includes: HashMap<PathBuf, String>,
}

impl Symbols {
    /// 创建一个空的符号表。
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录一个编译成功的文件。
    pub fn commit(&mut self, path: impl Into<PathBuf>, spec: &Specification) {
        self.includes
            .insert(path.into(), spec.principal_sort().name.to_string());
        self.sorts.extend(spec.sorts.iter().cloned());
        for op in spec.functions() {
            self.operator_labels
                .insert(op.name.to_string(), op.label.to_string());
            self.functions.push(op.clone());
        }
    }

    /// 文件是否已经编译过。
    pub fn is_compiled(&self, path: &Path) -> bool {
        self.includes.contains_key(path)
    }

    /// 文件定义的主排序。
    pub fn principal_sort(&self, path: &Path) -> Option<&str> {
        self.includes.get(path).map(String::as_str)
    }

    /// 文件主排序的短标签。
    pub fn principal_label(&self, path: &Path) -> Option<&str> {
        let name = self.principal_sort(path)?;
        self.sorts
            .iter()
            .find(|sort| sort.name.as_str() == name)
            .map(|sort| sort.label.as_str())
    }

    /// 运算符的短标签。
    pub fn operator_label(&self, name: &str) -> Option<&str> {
        self.operator_labels.get(name).map(String::as_str)
    }

    /// 所有已知排序。
    pub fn sorts(&self) -> &[SortDecl] {
        &self.sorts
    }

    /// 所有已知函数声明。
    pub fn functions(&self) -> &[OpDecl] {
        &self.functions
    }
}

/// 编译单个文件时的查找视图
pub struct Scope<'a> {
    spec: &'a Specification,
    symbols: &'a Symbols,
    parameters: BTreeSet<String>,
}

impl<'a> Scope<'a> {
    /// 为 `spec` 创建查找视图。
    pub fn new(spec: &'a Specification, symbols: &'a Symbols) -> Self {
        let mut scope = Self {
            spec,
            symbols,
            parameters: BTreeSet::new(),
        };
        scope.parameters = scope.formal_parameters();
        scope
    }

    /// 当前文件的规约。
    pub fn spec(&self) -> &'a Specification {
        self.spec
    }

    /// 可见的排序声明，当前文件在前。
    pub fn sorts(&self) -> impl Iterator<Item = &'a SortDecl> {
        self.spec.sorts.iter().chain(self.symbols.sorts().iter())
    }

    /// 可见的函数声明，当前文件在前。
    pub fn functions(&self) -> impl Iterator<Item = &'a OpDecl> {
        self.spec.functions().chain(self.symbols.functions().iter())
    }

    /// 按完整名称查找排序声明。
    pub fn find_sort(&self, name: &str) -> Option<&'a SortDecl> {
        self.sorts().find(|sort| sort.name.as_str() == name)
    }

    /// 名称是否是一个排序参数。
    pub fn is_parameter(&self, name: &str) -> bool {
        self.find_sort(name).is_none() && self.parameters.contains(name)
    }

    /// 可见的容器排序的形式参数，加上当前文件中出现在容器排序参数位置上的未声明名称。
    fn formal_parameters(&self) -> BTreeSet<String> {
        let mut parameters = self
            .sorts()
            .filter_map(|sort| sort.param.as_ref())
            .map(|param| param.to_string())
            .collect::<BTreeSet<_>>();

        let mut visit = |sort: &SortExpr| self.collect_container_arguments(sort, &mut parameters);
        for op in self.spec.functions() {
            visit(&op.sort);
        }
        for var in &self.spec.variables {
            visit(&var.sort);
        }
        for equation in &self.spec.equations {
            for expr in [&equation.condition, &equation.lhs, &equation.rhs] {
                for_each_binder_sort(expr, &mut visit);
            }
        }
        parameters
    }

    fn collect_container_arguments(&self, sort: &SortExpr, parameters: &mut BTreeSet<String>) {
        match sort {
            SortExpr::Primary(_) => {}
            SortExpr::Arrow { domain, codomain } => {
                for position in &domain.positions {
                    self.collect_container_arguments(&position.sort, parameters);
                }
                self.collect_container_arguments(codomain, parameters);
            }
            SortExpr::Param { param, .. } => {
                if self.find_sort(param).is_none() {
                    parameters.insert(param.to_string());
                }
            }
        }
    }
}

fn for_each_binder_sort(expr: &DataExpr, visit: &mut impl FnMut(&SortExpr)) {
    match expr {
        DataExpr::Ident(_) => {}
        DataExpr::Application { head, args } => {
            for_each_binder_sort(head, visit);
            for arg in args {
                for_each_binder_sort(arg, visit);
            }
        }
        DataExpr::Binder { var, body, .. } => {
            visit(&var.sort);
            for_each_binder_sort(body, visit);
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::frontend::parse_source;

    pub(crate) fn spec(source: &str) -> Specification {
        parse_source(source).unwrap()
    }

    #[test]
    fn commit_records_principal_sort_and_labels() {
        let bool_spec = spec("sort Bool <\"bool_\">; cons true <\"true_\"> : Bool;");
        let mut symbols = Symbols::new();
        symbols.commit("/lib/bool.spec", &bool_spec);

        let path = Path::new("/lib/bool.spec");
        assert!(symbols.is_compiled(path));
        assert_eq!(symbols.principal_sort(path), Some("Bool"));
        assert_eq!(symbols.principal_label(path), Some("bool_"));
        assert_eq!(symbols.operator_label("true"), Some("true_"));
        assert!(!symbols.is_compiled(Path::new("/lib/nat.spec")));
    }

    #[test]
    fn local_declarations_shadow_cached_ones() {
        let mut symbols = Symbols::new();
        symbols.commit("/a.spec", &spec("sort Bool <\"old\">;"));
        let local = spec("sort Bool <\"new\">;");
        let scope = Scope::new(&local, &symbols);
        assert_eq!(scope.find_sort("Bool").map(|s| s.label.as_str()), Some("new"));
        assert_eq!(scope.sorts().count(), 2);
    }

    #[test]
    fn parameters_come_from_containers() {
        let mut symbols = Symbols::new();
        symbols.commit("/list.spec", &spec("sort List(T) <\"list\">;"));
        let local = spec(
            "sort Set(S) <\"set_\">; map f <\"f\"> : Bag(E) -> Nat;\n\
             eqn lambda(x: FSet(U), x) = g;",
        );
        let scope = Scope::new(&local, &symbols);
        for name in ["S", "T", "E", "U"] {
            assert!(scope.is_parameter(name), "{} should be a parameter", name);
        }
        assert!(!scope.is_parameter("Nat"));
        assert!(!scope.is_parameter("Set"));
    }
}
