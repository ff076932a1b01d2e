//! Lowers a parsed specification into a [`Library`].

use crate::{
    error::SourceError,
    frontend::ast::{self, DataExpr, Ident, OpDecl, SortDecl, SortExpr, Specification, VarDecl},
    semantic::{collect_projections, Resolved, Scope, Symbols, Variables},
};

use super::{ArgumentCheck, Equation, EquationTable, Function, Library, Sort, Term, Variable};

/// Builder for the library of one specification.
pub struct LibraryBuilder<'a> {
    scope: Scope<'a>,
    includes: Vec<String>,
}

impl<'a> LibraryBuilder<'a> {
    /// Creates a builder resolving names against `spec` first, then `symbols`.
    pub fn new(spec: &'a Specification, symbols: &'a Symbols) -> Self {
        Self {
            scope: Scope::new(spec, symbols),
            includes: vec![],
        }
    }

    /// Adds the library of an included sort, unless it is declared locally or already added.
    pub fn include(&mut self, sort: &str, label: &str) -> &mut Self {
        let local = self
            .scope
            .spec()
            .sorts
            .iter()
            .any(|decl| decl.name.as_str() == sort);
        if !local && !self.includes.iter().any(|l| l == label) {
            self.includes.push(label.to_string());
        }
        self
    }

    /// Builds the library.
    pub fn build(self) -> Result<Library, SourceError> {
        let spec = self.scope.spec();
        let principal = spec.principal_sort();

        let sorts = spec.sorts.iter().map(Self::sort).collect();
        let functions = spec
            .functions()
            .map(|op| self.function(op))
            .collect::<Result<Vec<_>, _>>()?;
        let projections = collect_projections(spec.functions());

        let sort_params = self
            .scope
            .equation_parameters(&spec.equations)
            .into_iter()
            .collect();
        let mut variables = Variables::new(&spec.variables);
        let equations = spec
            .equations
            .iter()
            .map(|equation| self.equation(equation, &mut variables))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Library {
            sort: principal.name.to_string(),
            label: principal.label.to_string(),
            includes: self.includes,
            sorts,
            functions,
            projections,
            equations: EquationTable {
                sort_params,
                equations,
            },
        })
    }

    fn sort(decl: &SortDecl) -> Sort {
        Sort {
            name: decl.name.to_string(),
            label: decl.label.to_string(),
            param: decl.param.as_ref().map(|param| param.to_string()),
        }
    }

    fn sort_args(&self, op: &OpDecl) -> Vec<String> {
        self.scope.sort_parameters(&op.sort).into_iter().collect()
    }

    fn function(&self, op: &OpDecl) -> Result<Function, SourceError> {
        let arguments = match &op.sort {
            SortExpr::Arrow { domain, .. } => Some(
                domain
                    .positions
                    .iter()
                    .map(|position| self.argument_check(&position.sort))
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            _ => None,
        };

        Ok(Function {
            name: op.name.to_string(),
            label: op.label.to_string(),
            sort_params: self.sort_args(op),
            sort: self.scope.resolve_sort(&op.sort)?,
            arguments,
        })
    }

    fn argument_check(&self, sort: &SortExpr) -> Result<ArgumentCheck, SourceError> {
        match sort {
            SortExpr::Param { container, .. } => Ok(ArgumentCheck::Recogniser(
                self.scope.sort_label(container)?.to_string(),
            )),
            SortExpr::Primary(name) if !self.scope.is_parameter(name) => Ok(
                ArgumentCheck::Recogniser(self.scope.sort_label(name)?.to_string()),
            ),
            _ => Ok(ArgumentCheck::SortEquals(self.scope.resolve_sort(sort)?)),
        }
    }

    fn variable(&self, var: &VarDecl) -> Result<Variable, SourceError> {
        Ok(Variable {
            name: var.name.to_string(),
            sort: self.scope.resolve_sort(&var.sort)?,
        })
    }

    fn equation(
        &self,
        equation: &'a ast::Equation,
        variables: &mut Variables<'a>,
    ) -> Result<Equation, SourceError> {
        let mut free = self.scope.free_variables(&equation.lhs, variables);
        free.extend(self.scope.free_variables(&equation.rhs, variables));
        let free = free
            .values()
            .map(|var| self.variable(var))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Equation {
            variables: free,
            condition: self.term(&equation.condition, variables)?,
            lhs: self.term(&equation.lhs, variables)?,
            rhs: self.term(&equation.rhs, variables)?,
        })
    }

    fn term(
        &self,
        expr: &'a DataExpr,
        variables: &mut Variables<'a>,
    ) -> Result<Term, SourceError> {
        match expr {
            DataExpr::Ident(name) => self.identifier(name, 0, variables),
            DataExpr::Application { head, args } => {
                let args = args
                    .iter()
                    .map(|arg| self.term(arg, variables))
                    .collect::<Result<Vec<_>, _>>()?;
                let head = match head.as_ref() {
                    DataExpr::Ident(name) => {
                        if let Resolved::Function(op) =
                            self.scope.resolve_identifier(name, args.len(), variables)?
                        {
                            return Ok(Term::Call {
                                label: op.label.to_string(),
                                sort_args: self.sort_args(op),
                                args,
                            });
                        }
                        self.identifier(name, args.len(), variables)?
                    }
                    head => self.term(head, variables)?,
                };
                Ok(Term::Apply {
                    head: Box::new(head),
                    args,
                })
            }
            DataExpr::Binder { kind, var, body } => {
                let bound = self.variable(var)?;
                variables.bind(var);
                let body = self.term(body, variables);
                variables.unbind();
                Ok(Term::Binder {
                    kind: *kind,
                    var: bound,
                    body: Box::new(body?),
                })
            }
        }
    }

    fn identifier(
        &self,
        name: &Ident,
        arity: usize,
        variables: &Variables<'a>,
    ) -> Result<Term, SourceError> {
        match self.scope.resolve_identifier(name, arity, variables)? {
            Resolved::Literal(label) => Ok(Term::Constant {
                label: label.to_string(),
                sort_args: vec![],
            }),
            Resolved::Function(op) => Ok(Term::Constant {
                label: op.label.to_string(),
                sort_args: self.sort_args(op),
            }),
            Resolved::Variable(var) => Ok(Term::Variable(self.variable(var)?)),
        }
    }
}
