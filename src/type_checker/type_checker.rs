use std::collections::HashMap;

use log::debug;

use crate::{
    ast::{
        ast::Program,
        statements::{ClassDefStmt, FnDefStmt, Stmt},
        types::Type,
    },
    errors::errors::{Error, ErrorImpl, NameErrorReason},
    Position,
};

use super::{
    scope::{ClassInfo, FunctionSignature, ScopeStack, Symbol},
    stmt::type_check_stmt,
    typed_ast::TypedProgram,
};

#[derive(Debug, Default)]
pub struct TypeChecker {
    pub scopes: ScopeStack,
    /// Declared return types of the functions being checked, innermost last.
    return_types: Vec<Type>,
}

impl TypeChecker {
    pub fn new() -> Self {
        TypeChecker {
            scopes: ScopeStack::new(),
            return_types: vec![],
        }
    }

    /// Return type expected by a `return` at the current position.
    ///
    /// A `return` outside of any function is checked against `None`.
    pub fn current_return_type(&self) -> &Type {
        self.return_types.last().unwrap_or(&Type::None)
    }

    /// Runs `f` inside a fresh innermost scope, popping it again however `f` returns.
    pub fn with_scope<T>(&mut self, f: impl FnOnce(&mut TypeChecker) -> Result<T, Error>) -> Result<T, Error> {
        self.scopes.enter_scope();
        let result = f(self);
        self.scopes.exit_scope();
        result
    }

    /// Checks that a type written in the source names something that exists.
    pub fn resolve_type(&self, ty: &Type, position: &Position) -> Result<(), Error> {
        let Type::Class(name) = ty else {
            return Ok(());
        };

        match self.scopes.lookup(name, false) {
            Some(Symbol::Class(_)) => Ok(()),
            Some(_) => Err(Error::new(
                ErrorImpl::NameError {
                    name: name.clone(),
                    reason: NameErrorReason::NotAClass,
                },
                position.clone(),
            )),
            None => Err(Error::new(
                ErrorImpl::NameError {
                    name: name.clone(),
                    reason: NameErrorReason::NotDefined,
                },
                position.clone(),
            )),
        }
    }

    /// Looks up the members of the class behind an object type.
    pub fn class_info<'a>(&'a self, ty: &'a Type, member: &str, position: &Position) -> Result<(&'a str, &'a ClassInfo), Error> {
        let Type::Class(name) = ty else {
            return Err(Error::new(
                ErrorImpl::NameError {
                    name: format!("{}.{}", ty, member),
                    reason: NameErrorReason::NotAClass,
                },
                position.clone(),
            ));
        };

        match self.scopes.lookup(name, false) {
            Some(Symbol::Class(info)) => Ok((name, info)),
            Some(_) => Err(Error::new(
                ErrorImpl::NameError {
                    name: name.clone(),
                    reason: NameErrorReason::NotAClass,
                },
                position.clone(),
            )),
            None => Err(Error::new(
                ErrorImpl::NameError {
                    name: name.clone(),
                    reason: NameErrorReason::NotDefined,
                },
                position.clone(),
            )),
        }
    }
}

/// Checks a whole program, annotating every expression with its type.
///
/// The first violation aborts checking; no partial result is returned.
pub fn type_check(program: Program) -> Result<TypedProgram, Error> {
    debug!("type checking {} top-level statements", program.body.len());

    let mut type_checker = TypeChecker::new();
    // The global scope lives as long as the checker.
    type_checker.scopes.enter_scope();
    type_check_block(&mut type_checker, &program.body)?;

    debug!("type checking finished");
    Ok(TypedProgram::new(program))
}

/// Checks one block in the current innermost scope.
///
/// Declarations are validated for ordering and registered before any statement
/// is checked, so statements may refer to functions and classes declared later
/// in the same block.
pub fn type_check_block(type_checker: &mut TypeChecker, body: &[Stmt]) -> Result<(), Error> {
    check_definition_order(body)?;
    register_declarations(type_checker, body)?;

    for stmt in body {
        type_check_stmt(type_checker, stmt)?;
    }

    Ok(())
}

/// Rejects a block in which a declaration follows an executable statement.
pub fn check_definition_order(body: &[Stmt]) -> Result<(), Error> {
    let mut seen_statement = false;

    for stmt in body {
        if !stmt.is_declaration() {
            seen_statement = true;
        } else if seen_statement {
            return Err(Error::new(
                ErrorImpl::DefinitionOrderError {
                    name: stmt.declared_name().unwrap_or_default().to_string(),
                },
                stmt.get_span().start.clone(),
            ));
        }
    }

    Ok(())
}

fn register_declarations(type_checker: &mut TypeChecker, body: &[Stmt]) -> Result<(), Error> {
    for stmt in body {
        match stmt {
            Stmt::VarDecl(var_decl) => type_checker.scopes.define(
                &var_decl.identifier,
                Symbol::Variable(var_decl.var_type.clone()),
                var_decl.span.start.clone(),
            )?,
            Stmt::FnDef(function) => type_checker.scopes.define(
                &function.identifier,
                Symbol::Function(signature_of(function)),
                function.span.start.clone(),
            )?,
            Stmt::ClassDef(class) => type_checker.scopes.define(
                &class.name,
                Symbol::Class(class_info_of(class)?),
                class.span.start.clone(),
            )?,
            _ => {}
        }
    }

    Ok(())
}

fn signature_of(function: &FnDefStmt) -> FunctionSignature {
    FunctionSignature {
        parameters: function.parameter_types(),
        return_type: function.return_type.clone(),
    }
}

/// Collects a class's member table; fields and methods share one namespace.
fn class_info_of(class: &ClassDefStmt) -> Result<ClassInfo, Error> {
    let mut fields = HashMap::new();
    let mut methods = HashMap::new();

    for field in class.fields.iter() {
        if fields.contains_key(&field.identifier) {
            return Err(duplicate(&field.identifier, &field.span.start));
        }
        fields.insert(field.identifier.clone(), field.var_type.clone());
    }

    for method in class.methods.iter() {
        if fields.contains_key(&method.identifier) || methods.contains_key(&method.identifier) {
            return Err(duplicate(&method.identifier, &method.span.start));
        }
        methods.insert(method.identifier.clone(), signature_of(method));
    }

    Ok(ClassInfo { methods, fields })
}

fn duplicate(name: &str, position: &Position) -> Error {
    Error::new(
        ErrorImpl::DuplicateDefinition {
            name: name.to_string(),
        },
        position.clone(),
    )
}

/// Checks a function or method definition in a scope of its own.
pub fn type_check_function(type_checker: &mut TypeChecker, function: &FnDefStmt) -> Result<(), Error> {
    for parameter in function.parameters.iter() {
        type_checker.resolve_type(&parameter.param_type, &function.span.start)?;
    }
    type_checker.resolve_type(&function.return_type, &function.span.start)?;

    if function.return_type != Type::None && !all_paths_return(&function.body) {
        return Err(Error::new(
            ErrorImpl::MissingReturn {
                function: function.identifier.clone(),
            },
            function.span.start.clone(),
        ));
    }

    type_checker.return_types.push(function.return_type.clone());
    let result = type_checker.with_scope(|type_checker| {
        for parameter in function.parameters.iter() {
            type_checker.scopes.define(
                &parameter.name,
                Symbol::Variable(parameter.param_type.clone()),
                function.span.start.clone(),
            )?;
        }

        type_check_block(type_checker, &function.body)
    });
    type_checker.return_types.pop();

    result
}

/// Structural return-path analysis.
///
/// A body returns on all paths when it contains a `return`, or an `if` whose
/// then, elif and else bodies each return on all paths. Loops never count.
pub fn all_paths_return(body: &[Stmt]) -> bool {
    body.iter().any(|stmt| match stmt {
        Stmt::Return(_) => true,
        Stmt::If(if_stmt) => {
            all_paths_return(&if_stmt.then_body)
                && if_stmt
                    .elif_clauses
                    .iter()
                    .all(|clause| all_paths_return(&clause.body))
                && all_paths_return(&if_stmt.else_body)
        }
        _ => false,
    })
}
