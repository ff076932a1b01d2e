//! Resolved description of a generated data library.

use std::fmt::Display;

use crate::frontend::ast::BinderKind;

pub mod builder;
pub mod target;

pub use builder::LibraryBuilder;

/// A sort as it appears in generated code
#[allow(missing_docs)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SortRef {
    /// Declared sort, `label()`
    Basic { label: String },
    /// Sort parameter, passed in as an argument
    Param(String),
    /// Container sort applied to a sort, `label(arg)`
    Container { label: String, arg: Box<SortRef> },
    /// Function sort
    Function {
        domain: Vec<SortRef>,
        codomain: Box<SortRef>,
    },
}

impl Display for SortRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortRef::Basic { label } => write!(f, "{}()", label),
            SortRef::Param(name) => write!(f, "{}", name.to_lowercase()),
            SortRef::Container { label, arg } => write!(f, "{}({})", label, arg),
            SortRef::Function { domain, codomain } => {
                write!(f, "function_sort(")?;
                for sort in domain {
                    write!(f, "{}, ", sort)?;
                }
                write!(f, "{})", codomain)
            }
        }
    }
}

/// A variable with its sort
#[allow(missing_docs)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Variable {
    pub name: String,
    pub sort: SortRef,
}

impl Display for Variable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "variable(\"{}\", {})", self.name, self.sort)
    }
}

/// A data term as it appears in generated code
#[allow(missing_docs)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Term {
    /// Function symbol or literal without arguments
    Constant {
        label: String,
        sort_args: Vec<String>,
    },
    /// Function symbol applied to as many arguments as it declares
    Call {
        label: String,
        sort_args: Vec<String>,
        args: Vec<Term>,
    },
    Variable(Variable),
    /// Any other application
    Apply { head: Box<Term>, args: Vec<Term> },
    Binder {
        kind: BinderKind,
        var: Variable,
        body: Box<Term>,
    },
}

fn join<T: Display>(items: impl IntoIterator<Item = T>) -> String {
    items
        .into_iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn lower_params(params: &[String]) -> Vec<String> {
    params.iter().map(|p| p.to_lowercase()).collect()
}

impl Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Term::Constant { label, sort_args } => {
                write!(f, "{}({})", label, lower_params(sort_args).join(", "))
            }
            Term::Call {
                label,
                sort_args,
                args,
            } => {
                let all = lower_params(sort_args)
                    .into_iter()
                    .chain(args.iter().map(|arg| arg.to_string()));
                write!(f, "{}({})", label, join(all))
            }
            Term::Variable(var) => write!(f, "{}", var),
            Term::Apply { head, args } => {
                write!(f, "application({}, {})", head, join(args))
            }
            Term::Binder { kind, var, body } => {
                write!(f, "{}(make_vector({}), {})", kind.keyword(), var, body)
            }
        }
    }
}

/// A sort declared by the library
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sort {
    /// Full name
    pub name: String,
    /// Short label used in generated identifiers
    pub label: String,
    /// Formal parameter of a container sort
    pub param: Option<String>,
}

/// Precondition on one argument of an application builder
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArgumentCheck {
    /// `is_<label>(arg.sort())`
    Recogniser(String),
    /// `arg.sort() == <sort>`
    SortEquals(SortRef),
}

/// A function symbol declared by the library
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Function {
    /// Full name
    pub name: String,
    /// Short label used in generated identifiers
    pub label: String,
    /// Sort parameters, sorted by name
    pub sort_params: Vec<String>,
    /// Sort of the symbol
    pub sort: SortRef,
    /// One check per argument, `None` if the symbol is not a function sort
    pub arguments: Option<Vec<ArgumentCheck>>,
}

/// A projection accessor shared by every function declaring the field
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Projection {
    /// Field label
    pub name: String,
    /// `(function label, argument index)`
    pub cases: Vec<(String, usize)>,
}

/// A defining equation
#[allow(missing_docs)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Equation {
    /// Free variables of both sides, sorted by name
    pub variables: Vec<Variable>,
    pub condition: Term,
    pub lhs: Term,
    pub rhs: Term,
}

impl Display for Equation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let variables = if self.variables.is_empty() {
            "variable_list()".to_string()
        } else {
            format!("make_vector({})", join(&self.variables))
        };
        write!(
            f,
            "data_equation({}, {}, {}, {})",
            variables, self.condition, self.lhs, self.rhs
        )
    }
}

/// The equation table of the principal sort
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EquationTable {
    /// Sort parameters, sorted by name
    pub sort_params: Vec<String>,
    /// Equations in declaration order
    pub equations: Vec<Equation>,
}

/// Everything needed to emit one library
#[allow(missing_docs)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Library {
    /// Full name of the principal sort
    pub sort: String,
    /// Label of the principal sort
    pub label: String,
    /// Labels of included libraries, in include order
    pub includes: Vec<String>,
    pub sorts: Vec<Sort>,
    pub functions: Vec<Function>,
    pub projections: Vec<Projection>,
    pub equations: EquationTable,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn basic(label: &str) -> SortRef {
        SortRef::Basic {
            label: label.to_string(),
        }
    }

    #[test]
    fn sort_codes() {
        let sort = SortRef::Function {
            domain: vec![
                SortRef::Container {
                    label: "list".to_string(),
                    arg: Box::new(SortRef::Param("S".to_string())),
                },
                basic("nat"),
            ],
            codomain: Box::new(SortRef::Param("S".to_string())),
        };
        assert_eq!(sort.to_string(), "function_sort(list(s), nat(), s)");
    }

    #[test]
    fn term_codes() {
        let x = Variable {
            name: "x".to_string(),
            sort: basic("bool_"),
        };
        let call = Term::Call {
            label: "insert".to_string(),
            sort_args: vec!["S".to_string()],
            args: vec![
                Term::Variable(x.clone()),
                Term::Constant {
                    label: "empty".to_string(),
                    sort_args: vec!["S".to_string()],
                },
            ],
        };
        assert_eq!(
            call.to_string(),
            "insert(s, variable(\"x\", bool_()), empty(s))"
        );

        let lambda = Term::Binder {
            kind: BinderKind::Lambda,
            var: x.clone(),
            body: Box::new(Term::Variable(x)),
        };
        let apply = Term::Apply {
            head: Box::new(lambda),
            args: vec![Term::Constant {
                label: "true_".to_string(),
                sort_args: vec![],
            }],
        };
        assert_eq!(
            apply.to_string(),
            "application(lambda(make_vector(variable(\"x\", bool_())), variable(\"x\", bool_())), true_())"
        );
    }

    #[test]
    fn equation_without_variables() {
        let truth = Term::Constant {
            label: "true_".to_string(),
            sort_args: vec![],
        };
        let equation = Equation {
            variables: vec![],
            condition: truth.clone(),
            lhs: truth.clone(),
            rhs: truth,
        };
        assert_eq!(
            equation.to_string(),
            "data_equation(variable_list(), true_(), true_(), true_())"
        );
    }
}
