//! LLVM IR generation for checked programs.
//!
//! The lowering covers what the analyzer accepts: functions with builtin
//! parameter and return types, numeric literals, parameter references,
//! unary and binary arithmetic, comparisons and returns. Anything else is
//! reported as unsupported instead of being emitted.

use std::{collections::HashMap, io::Write};

use inkwell::{
    builder::{Builder, BuilderError},
    context::Context,
    module::Module,
    types::{BasicMetadataTypeEnum, BasicType, BasicTypeEnum},
    values::{BasicValueEnum, FunctionValue},
    AddressSpace, FloatPredicate, IntPredicate,
};
use log::debug;

use crate::{
    ast::{
        ast::Program,
        expressions::{BinaryExpr, Expr, ExprKind, UnaryExpr},
        statements::{BlockStmt, FnDeclStmt, Stmt},
        types::{BuiltinType, Type},
    },
    lexer::tokens::{LiteralValue, TokenKind},
};

use super::compiler::{CodeGenerator, CodegenError};

impl From<BuilderError> for CodegenError {
    fn from(error: BuilderError) -> Self {
        CodegenError::Llvm(error.to_string())
    }
}

fn unsupported(construct: impl Into<String>) -> CodegenError {
    CodegenError::Unsupported {
        backend: "llvm",
        construct: construct.into(),
    }
}

pub struct LlvmGenerator {
    module: String,
}

impl LlvmGenerator {
    pub fn new(module: &str) -> Self {
        LlvmGenerator {
            module: module.to_string(),
        }
    }
}

impl CodeGenerator for LlvmGenerator {
    fn name(&self) -> &'static str {
        "llvm"
    }

    fn generate(&mut self, programs: &[Program], sink: &mut dyn Write) -> Result<(), CodegenError> {
        let context = Context::create();
        let mut lowering = Lowering::new(&context, &self.module);

        let functions = programs.iter().flat_map(|p| p.functions()).collect::<Vec<_>>();

        // Declare everything first, bodies may refer to later functions.
        for decl in &functions {
            lowering.declare(decl)?;
        }

        for decl in &functions {
            lowering.define(decl)?;
        }

        lowering
            .module
            .verify()
            .map_err(|message| CodegenError::Llvm(message.to_string()))?;

        debug!("llvm: lowered {} function(s) into {}", functions.len(), self.module);

        sink.write_all(lowering.module.print_to_string().to_string().as_bytes())?;
        Ok(())
    }
}

struct Lowering<'ctx> {
    context: &'ctx Context,
    module: Module<'ctx>,
    builder: Builder<'ctx>,
    functions: HashMap<String, FunctionValue<'ctx>>,
    values: HashMap<String, BasicValueEnum<'ctx>>,
}

impl<'ctx> Lowering<'ctx> {
    fn new(context: &'ctx Context, module: &str) -> Self {
        Lowering {
            context,
            module: context.create_module(module),
            builder: context.create_builder(),
            functions: HashMap::new(),
            values: HashMap::new(),
        }
    }

    fn convert_type(&self, ty: &Type) -> Result<BasicTypeEnum<'ctx>, CodegenError> {
        let Some(builtin) = ty.as_builtin() else {
            return Err(unsupported(format!("type {}", ty)));
        };

        Ok(match builtin {
            BuiltinType::I8 | BuiltinType::U8 => self.context.i8_type().into(),
            BuiltinType::I16 | BuiltinType::U16 => self.context.i16_type().into(),
            BuiltinType::I32 | BuiltinType::U32 => self.context.i32_type().into(),
            BuiltinType::I64 | BuiltinType::U64 => self.context.i64_type().into(),
            BuiltinType::F32 => self.context.f32_type().into(),
            BuiltinType::F64 => self.context.f64_type().into(),
            BuiltinType::Bool => self.context.bool_type().into(),
            BuiltinType::Ptr => self.context.i8_type().ptr_type(AddressSpace::default()).into(),
        })
    }

    fn declare(&mut self, decl: &FnDeclStmt) -> Result<(), CodegenError> {
        let parameters = decl
            .parameters
            .iter()
            .map(|p| self.convert_type(&p.ty).map(BasicMetadataTypeEnum::from))
            .collect::<Result<Vec<_>, _>>()?;

        let fn_type = match &decl.return_type {
            Some(ty) => self.convert_type(ty)?.fn_type(&parameters, false),
            None => self.context.void_type().fn_type(&parameters, false),
        };

        let name = decl.name.name();
        let function = self.module.add_function(name, fn_type, None);
        self.functions.insert(name.to_string(), function);

        Ok(())
    }

    fn define(&mut self, decl: &FnDeclStmt) -> Result<(), CodegenError> {
        let Some(body) = &decl.body else {
            return Ok(());
        };

        let name = decl.name.name();
        let function = *self
            .functions
            .get(name)
            .ok_or_else(|| CodegenError::Llvm(format!("function {} was never declared", name)))?;

        let entry = self.context.append_basic_block(function, "entry");
        self.builder.position_at_end(entry);

        self.values.clear();
        for (idx, parameter) in decl.parameters.iter().enumerate() {
            if let Some(value) = function.get_nth_param(idx as u32) {
                self.values.insert(parameter.name.name().to_string(), value);
            }
        }

        self.gen_block(body)?;

        if !self.is_terminated() {
            match decl.return_type {
                None => self.builder.build_return(None)?,
                Some(_) => self.builder.build_unreachable()?,
            };
        }

        Ok(())
    }

    fn is_terminated(&self) -> bool {
        self.builder
            .get_insert_block()
            .and_then(|block| block.get_terminator())
            .is_some()
    }

    fn gen_block(&mut self, block: &BlockStmt) -> Result<(), CodegenError> {
        for stmt in &block.body {
            // Statements after a return are dead.
            if self.is_terminated() {
                break;
            }
            self.gen_stmt(stmt)?;
        }

        Ok(())
    }

    fn gen_stmt(&mut self, stmt: &Stmt) -> Result<(), CodegenError> {
        match stmt {
            Stmt::FunctionDeclaration(_) => return Err(unsupported("nested function")),
            Stmt::Return(ret) => match &ret.value {
                Some(value) => {
                    let value = self.gen_expr(value)?;
                    self.builder.build_return(Some(&value))?;
                }
                None => {
                    self.builder.build_return(None)?;
                }
            },
            Stmt::Expression(stmt) => {
                self.gen_expr(&stmt.expression)?;
            }
            Stmt::Block(block) => self.gen_block(block)?,
        }

        Ok(())
    }

    fn gen_expr(&self, expr: &Expr) -> Result<BasicValueEnum<'ctx>, CodegenError> {
        match &expr.kind {
            ExprKind::Literal(token) => match &token.value {
                Some(value) => self.gen_literal(value),
                None => Err(unsupported(format!("literal {}", token.lexeme))),
            },
            ExprKind::Identifier(token) => self
                .values
                .get(token.name())
                .copied()
                .ok_or_else(|| unsupported(format!("function value {}", token.name()))),
            ExprKind::Unary(unary) => self.gen_unary(unary),
            ExprKind::Binary(binary) => self.gen_binary(binary),
            ExprKind::Call(_) => Err(unsupported("call")),
            ExprKind::Indexed(_) => Err(unsupported("index")),
        }
    }

    fn gen_literal(&self, value: &LiteralValue) -> Result<BasicValueEnum<'ctx>, CodegenError> {
        let context = self.context;

        Ok(match *value {
            LiteralValue::I8(v) => context.i8_type().const_int(v as u64, true).into(),
            LiteralValue::I16(v) => context.i16_type().const_int(v as u64, true).into(),
            LiteralValue::I32(v) => context.i32_type().const_int(v as u64, true).into(),
            LiteralValue::I64(v) => context.i64_type().const_int(v as u64, true).into(),
            LiteralValue::U8(v) => context.i8_type().const_int(v as u64, false).into(),
            LiteralValue::U16(v) => context.i16_type().const_int(v as u64, false).into(),
            LiteralValue::U32(v) => context.i32_type().const_int(v as u64, false).into(),
            LiteralValue::U64(v) => context.i64_type().const_int(v, false).into(),
            LiteralValue::F32(v) => context.f32_type().const_float(v as f64).into(),
            LiteralValue::F64(v) => context.f64_type().const_float(v).into(),
            LiteralValue::Char(_) | LiteralValue::Str(_) => {
                return Err(unsupported(format!("literal {}", value)))
            }
        })
    }

    fn gen_unary(&self, unary: &UnaryExpr) -> Result<BasicValueEnum<'ctx>, CodegenError> {
        let operand = self.gen_expr(&unary.operand)?;
        let is_float = operand_builtin(&unary.operand)?.is_float();

        match unary.operator.kind {
            TokenKind::Plus => Ok(operand),
            TokenKind::Dash if is_float => Ok(self
                .builder
                .build_float_neg(operand.into_float_value(), "neg")?
                .into()),
            TokenKind::Dash => Ok(self.builder.build_int_neg(operand.into_int_value(), "neg")?.into()),
            _ => Err(unsupported(format!("unary {}", unary.operator.lexeme))),
        }
    }

    fn gen_binary(&self, binary: &BinaryExpr) -> Result<BasicValueEnum<'ctx>, CodegenError> {
        let builtin = operand_builtin(&binary.left)?;
        let left = self.gen_expr(&binary.left)?;
        let right = self.gen_expr(&binary.right)?;
        let kind = binary.operator.kind;

        if builtin.is_float() {
            let (l, r) = (left.into_float_value(), right.into_float_value());

            if let Some(predicate) = float_predicate(kind) {
                return Ok(self.builder.build_float_compare(predicate, l, r, "cmp")?.into());
            }

            let value = match kind {
                TokenKind::Plus => self.builder.build_float_add(l, r, "add")?,
                TokenKind::Dash => self.builder.build_float_sub(l, r, "sub")?,
                TokenKind::Star => self.builder.build_float_mul(l, r, "mul")?,
                TokenKind::Slash => self.builder.build_float_div(l, r, "div")?,
                TokenKind::Percent => self.builder.build_float_rem(l, r, "rem")?,
                _ => return Err(unsupported(format!("binary {}", binary.operator.lexeme))),
            };
            return Ok(value.into());
        }

        if !builtin.is_numeric() {
            return Err(unsupported(format!("{} operands", builtin.name())));
        }

        let (l, r) = (left.into_int_value(), right.into_int_value());
        let signed = builtin.is_signed();

        if let Some(predicate) = int_predicate(kind, signed) {
            return Ok(self.builder.build_int_compare(predicate, l, r, "cmp")?.into());
        }

        let value = match kind {
            TokenKind::Plus => self.builder.build_int_add(l, r, "add")?,
            TokenKind::Dash => self.builder.build_int_sub(l, r, "sub")?,
            TokenKind::Star => self.builder.build_int_mul(l, r, "mul")?,
            TokenKind::Slash if signed => self.builder.build_int_signed_div(l, r, "div")?,
            TokenKind::Slash => self.builder.build_int_unsigned_div(l, r, "div")?,
            TokenKind::Percent if signed => self.builder.build_int_signed_rem(l, r, "rem")?,
            TokenKind::Percent => self.builder.build_int_unsigned_rem(l, r, "rem")?,
            _ => return Err(unsupported(format!("binary {}", binary.operator.lexeme))),
        };

        Ok(value.into())
    }
}

/// The builtin type the analyzer inferred for an operand.
fn operand_builtin(expr: &Expr) -> Result<BuiltinType, CodegenError> {
    expr.inferred_type
        .as_builtin()
        .ok_or_else(|| unsupported(format!("operand of type {}", expr.inferred_type)))
}

fn int_predicate(kind: TokenKind, signed: bool) -> Option<IntPredicate> {
    Some(match (kind, signed) {
        (TokenKind::Equals, _) => IntPredicate::EQ,
        (TokenKind::NotEquals, _) => IntPredicate::NE,
        (TokenKind::Less, true) => IntPredicate::SLT,
        (TokenKind::Less, false) => IntPredicate::ULT,
        (TokenKind::Greater, true) => IntPredicate::SGT,
        (TokenKind::Greater, false) => IntPredicate::UGT,
        (TokenKind::LessEquals, true) => IntPredicate::SLE,
        (TokenKind::LessEquals, false) => IntPredicate::ULE,
        (TokenKind::GreaterEquals, true) => IntPredicate::SGE,
        (TokenKind::GreaterEquals, false) => IntPredicate::UGE,
        _ => return None,
    })
}

fn float_predicate(kind: TokenKind) -> Option<FloatPredicate> {
    Some(match kind {
        TokenKind::Equals => FloatPredicate::OEQ,
        TokenKind::NotEquals => FloatPredicate::ONE,
        TokenKind::Less => FloatPredicate::OLT,
        TokenKind::Greater => FloatPredicate::OGT,
        TokenKind::LessEquals => FloatPredicate::OLE,
        TokenKind::GreaterEquals => FloatPredicate::OGE,
        _ => return None,
    })
}
