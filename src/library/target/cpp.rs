//! Emits a C++ header for the data library

use std::io::{Result, Write};

use crate::{
    library::{ArgumentCheck, EquationTable, Function, Library, Projection, Sort},
    options::Options,
};

/// C++ header target
pub struct Cpp;

impl super::Target for Cpp {
    fn write(mut f: impl Write, library: &Library, options: &Options) -> Result<()> {
        Self::write_header(&mut f, library, options)?;

        for sort in &library.sorts {
            Self::write_sort(&mut f, sort)?;
        }
        for function in &library.functions {
            Self::write_function(&mut f, function)?;
        }
        for projection in &library.projections {
            Self::write_projection(&mut f, projection)?;
        }
        Self::write_equations(&mut f, &library.sort, &library.label, &library.equations)?;

        Self::write_footer(&mut f, library, options)
    }
}

impl Cpp {
    const LIBRARY_HEADERS: [&str; 6] = [
        "basic_sort",
        "function_sort",
        "function_symbol",
        "application",
        "data_equation",
        "utility",
    ];

    fn guard(library: &Library, options: &Options) -> String {
        let name = library.label.to_uppercase();
        match options.guard_prefix() {
            prefix if prefix.is_empty() => format!("{}_H", name),
            prefix => format!("{}_{}_H", prefix, name),
        }
    }

    fn header_path(options: &Options, name: &str) -> String {
        match options.namespaces() {
            segments if segments.is_empty() => format!("{}.h", name),
            segments => format!("{}/{}.h", segments.join("/"), name),
        }
    }

    fn namespaces(library: &Library, options: &Options) -> Vec<String> {
        options
            .namespaces()
            .into_iter()
            .map(str::to_string)
            .chain(std::iter::once(format!("sort_{}", library.label)))
            .collect()
    }

    fn write_header(mut f: impl Write, library: &Library, options: &Options) -> Result<()> {
        let guard = Self::guard(library, options);
        writeln!(f, "#ifndef {guard}")?;
        writeln!(f, "#define {guard}")?;
        writeln!(f)?;

        for name in Self::LIBRARY_HEADERS {
            writeln!(f, "#include \"{}\"", Self::header_path(options, name))?;
        }
        for label in &library.includes {
            writeln!(f, "#include \"{}\"", Self::header_path(options, label))?;
        }
        writeln!(f)?;

        for (depth, namespace) in Self::namespaces(library, options).iter().enumerate() {
            let indent = "  ".repeat(depth);
            writeln!(f, "{indent}namespace {namespace} {{")?;
            writeln!(f)?;
        }
        Ok(())
    }

    fn write_footer(mut f: impl Write, library: &Library, options: &Options) -> Result<()> {
        let mut namespaces = Self::namespaces(library, options);
        // 最内层的结束注释只写标签
        if let Some(innermost) = namespaces.last_mut() {
            *innermost = library.label.clone();
        }
        for (depth, namespace) in namespaces.iter().enumerate().rev() {
            let indent = "  ".repeat(depth);
            writeln!(f, "{indent}}} // namespace {namespace}")?;
        }
        writeln!(f)?;
        writeln!(f, "#endif // {}", Self::guard(library, options))
    }

    fn write_sort(mut f: impl Write, sort: &Sort) -> Result<()> {
        let Sort { name, label, param } = sort;
        match param {
            None => write!(
                f,
                r#"      // Sort expression {name}
      inline
      basic_sort {label}()
      {{
        static basic_sort {label}("{name}");
        return {label};
      }}

      // Recogniser for sort expression {name}
      inline
      bool is_{label}(const sort_expression& e)
      {{
        if (e.is_basic_sort())
        {{
          return static_cast<const basic_sort&>(e) == {label}();
        }}
        return false;
      }}

"#
            ),
            Some(param) => {
                let param = param.to_lowercase();
                write!(
                    f,
                    r#"      // Sort expression {name}({param})
      inline
      container_sort {label}(const sort_expression& {param})
      {{
        return container_sort("{label}", {param});
      }}

      // Recogniser for sort expression {name}({param})
      inline
      bool is_{label}(const sort_expression& e)
      {{
        if (e.is_container_sort())
        {{
          return static_cast<const container_sort&>(e).name() == "{label}";
        }}
        return false;
      }}

"#
                )
            }
        }
    }

    fn formal_sort_params(params: &[String]) -> Vec<String> {
        params
            .iter()
            .map(|p| format!("const sort_expression& {}", p.to_lowercase()))
            .collect()
    }

    fn write_function(mut f: impl Write, function: &Function) -> Result<()> {
        let Function {
            name,
            label,
            sort_params,
            sort,
            arguments,
        } = function;
        let formal_sorts = Self::formal_sort_params(sort_params);
        let actual_sorts = sort_params
            .iter()
            .map(|p| p.to_lowercase())
            .collect::<Vec<_>>()
            .join(", ");

        let signature = formal_sorts.join(", ");
        if sort_params.is_empty() {
            write!(
                f,
                r#"      // Function symbol {name}
      inline
      function_symbol {label}({signature})
      {{
        static function_symbol {label}("{name}", {sort});
        return {label};
      }}

"#
            )?;
        } else {
            write!(
                f,
                r#"      // Function symbol {name}
      inline
      function_symbol {label}({signature})
      {{
        return function_symbol("{name}", {sort});
      }}

"#
            )?;
        }

        write!(
            f,
            r#"      // Recogniser for {name}
      inline
      bool is_{label}_function_symbol(const data_expression& e)
      {{
        if (e.is_function_symbol())
        {{
          return static_cast<const function_symbol&>(e).name() == "{name}";
        }}
        return false;
      }}

"#
        )?;

        let Some(arguments) = arguments else {
            return Ok(());
        };

        let formals = formal_sorts
            .into_iter()
            .chain((0..arguments.len()).map(|i| format!("const data_expression& arg{}", i)))
            .collect::<Vec<_>>()
            .join(", ");
        let actuals = (0..arguments.len())
            .map(|i| format!("arg{}", i))
            .collect::<Vec<_>>()
            .join(", ");
        let assertions = arguments
            .iter()
            .enumerate()
            .map(|(i, check)| match check {
                ArgumentCheck::Recogniser(sort) => format!("assert(is_{}(arg{}.sort()));", sort, i),
                ArgumentCheck::SortEquals(sort) => format!("assert(arg{}.sort() == {});", i, sort),
            })
            .collect::<Vec<_>>()
            .join("\n        ");

        write!(
            f,
            r#"      // Application of {name}
      inline
      application {label}({formals})
      {{
        {assertions}
        return application({label}({actual_sorts}), {actuals});
      }}

      // Recogniser for application of {name}
      inline
      bool is_{label}_application(const data_expression& e)
      {{
        if (e.is_application())
        {{
          return is_{label}_function_symbol(static_cast<const application&>(e).head());
        }}
        return false;
      }}

"#
        )
    }

    fn write_projection(mut f: impl Write, projection: &Projection) -> Result<()> {
        let name = &projection.name;
        let recognisers = projection
            .cases
            .iter()
            .map(|(function, _)| format!("is_{}_application(e)", function))
            .collect::<Vec<_>>()
            .join(" || ");

        write!(
            f,
            r#"      // Function for projecting out {name}
      inline
      data_expression {name}(const data_expression& e)
      {{
        assert({recognisers});
"#
        )?;
        for (function, index) in &projection.cases {
            write!(
                f,
                r#"        if (is_{function}_application(e))
        {{
          return static_cast<const application&>(e).arguments()[{index}];
        }}
"#
            )?;
        }
        write!(
            f,
            r#"        // This should never be reached, otherwise something is severely wrong.
        assert(false);
      }}

"#
        )
    }

    fn write_equations(
        mut f: impl Write,
        sort: &str,
        label: &str,
        table: &EquationTable,
    ) -> Result<()> {
        let params = Self::formal_sort_params(&table.sort_params).join(", ");
        write!(
            f,
            r#"      // Give all system defined equations for {sort}
      inline
      data_equation_list {label}_generate_equations_code({params})
      {{
        data_equation_list result;
"#
        )?;
        for equation in &table.equations {
            writeln!(f, "        result.push_back({});", equation)?;
        }
        write!(
            f,
            r#"
        return result;
      }}

"#
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::{
        target::Target, Equation, EquationTable, Function, Library, Projection, Sort, SortRef,
        Term,
    };

    fn basic(label: &str) -> SortRef {
        SortRef::Basic {
            label: label.to_string(),
        }
    }

    fn bool_library() -> Library {
        let truth = Term::Constant {
            label: "true_".to_string(),
            sort_args: vec![],
        };
        Library {
            sort: "Bool".to_string(),
            label: "bool_".to_string(),
            includes: vec![],
            sorts: vec![Sort {
                name: "Bool".to_string(),
                label: "bool_".to_string(),
                param: None,
            }],
            functions: vec![Function {
                name: "true".to_string(),
                label: "true_".to_string(),
                sort_params: vec![],
                sort: basic("bool_"),
                arguments: None,
            }],
            projections: vec![],
            equations: EquationTable {
                sort_params: vec![],
                equations: vec![Equation {
                    variables: vec![],
                    condition: truth.clone(),
                    lhs: truth.clone(),
                    rhs: truth,
                }],
            },
        }
    }

    #[test]
    fn header_and_footer() {
        let mut library = bool_library();
        library.includes = vec!["nat".to_string()];
        let code = Cpp::render(&library, &Options::default()).unwrap();
        assert!(code.starts_with("#ifndef MCRL2_DATA_BOOL__H\n#define MCRL2_DATA_BOOL__H\n"));
        assert!(code.contains("#include \"mcrl2/data/data_equation.h\"\n"));
        assert!(code.contains("#include \"mcrl2/data/nat.h\"\n"));
        assert!(code.contains("namespace mcrl2 {\n\n  namespace data {\n\n    namespace sort_bool_ {\n"));
        assert!(code.ends_with(
            "    } // namespace bool_\n  } // namespace data\n} // namespace mcrl2\n\n#endif // MCRL2_DATA_BOOL__H\n"
        ));
    }

    #[test]
    fn custom_prefix() {
        let options = Options {
            include_prefix: "acme".to_string(),
            ..Default::default()
        };
        let code = Cpp::render(&bool_library(), &options).unwrap();
        assert!(code.starts_with("#ifndef ACME_BOOL__H\n"));
        assert!(code.contains("#include \"acme/utility.h\"\n"));
        assert!(code.contains("namespace acme {\n\n  namespace sort_bool_ {\n"));
        assert!(code.contains("  } // namespace bool_\n} // namespace acme\n"));
    }

    #[test]
    fn constant_symbol_has_no_application() {
        let code = Cpp::render(&bool_library(), &Options::default()).unwrap();
        assert!(code.contains("      basic_sort bool_()\n"));
        assert!(code.contains("static function_symbol true_(\"true\", bool_());"));
        assert!(code.contains("bool is_true__function_symbol(const data_expression& e)"));
        assert!(!code.contains("is_true__application"));
        assert!(code.contains("data_equation_list bool__generate_equations_code()\n"));
        assert!(code.contains(
            "        result.push_back(data_equation(variable_list(), true_(), true_(), true_()));\n"
        ));
    }

    #[test]
    fn application_with_sort_parameters() {
        let mut library = bool_library();
        library.functions = vec![Function {
            name: "@cons".to_string(),
            label: "cons_".to_string(),
            sort_params: vec!["S".to_string()],
            sort: SortRef::Function {
                domain: vec![SortRef::Param("S".to_string()), basic("list")],
                codomain: Box::new(basic("list")),
            },
            arguments: Some(vec![
                ArgumentCheck::SortEquals(SortRef::Param("S".to_string())),
                ArgumentCheck::Recogniser("list".to_string()),
            ]),
        }];
        let code = Cpp::render(&library, &Options::default()).unwrap();
        assert!(code.contains(
            "      function_symbol cons_(const sort_expression& s)\n      {\n        return function_symbol(\"@cons\", function_sort(s, list(), list()));\n"
        ));
        assert!(code.contains(
            "      application cons_(const sort_expression& s, const data_expression& arg0, const data_expression& arg1)\n"
        ));
        assert!(code.contains(
            "        assert(arg0.sort() == s);\n        assert(is_list(arg1.sort()));\n        return application(cons_(s), arg0, arg1);\n"
        ));
        assert!(code.contains("bool is_cons__application(const data_expression& e)"));
    }

    #[test]
    fn projection_tries_each_owner() {
        let mut library = bool_library();
        library.projections = vec![Projection {
            name: "value".to_string(),
            cases: vec![("leaf".to_string(), 0), ("node".to_string(), 1)],
        }];
        let code = Cpp::render(&library, &Options::default()).unwrap();
        assert!(code.contains("      data_expression value(const data_expression& e)\n"));
        assert!(code.contains("        assert(is_leaf_application(e) || is_node_application(e));\n"));
        assert!(code.contains(
            "        if (is_node_application(e))\n        {\n          return static_cast<const application&>(e).arguments()[1];\n        }\n"
        ));
        assert!(code.contains("        assert(false);\n"));
    }

    #[test]
    fn container_sort() {
        let mut library = bool_library();
        library.sorts = vec![Sort {
            name: "List".to_string(),
            label: "list".to_string(),
            param: Some("S".to_string()),
        }];
        let code = Cpp::render(&library, &Options::default()).unwrap();
        assert!(code.contains("      container_sort list(const sort_expression& s)\n"));
        assert!(code.contains("return static_cast<const container_sort&>(e).name() == \"list\";"));
    }
}
