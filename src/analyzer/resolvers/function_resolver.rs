use crate::{
    analyzer::{AnalysisContext, AnalyzerError, ColumnProvenanceResolver, JsonShapeExtractor, LiteralResolver, NullHandlingResolver},
    ast::{FunctionCall, ObjectName, ScalarExpr},
    catalog::SqlType,
    model::{ObjectKind, ObjectReference, ResultColumn},
    rules::{AggregateOperand, AggregateRegistry, BuiltinFunctions, BuiltinRule, TypePrecedence},
};

pub struct FunctionResolver;

impl FunctionResolver {
    pub fn resolve(ctx: &mut AnalysisContext, call: &FunctionCall) -> Result<ResultColumn, AnalyzerError> {
        let rule = match call.name.schema {
            None => BuiltinFunctions::classify(&call.name.name),
            Some(_) => None,
        };
        let Some(rule) = rule else {
            return Ok(Self::user_defined(ctx, call));
        };

        match rule {
            BuiltinRule::Aggregate => Self::aggregate(ctx, call),
            BuiltinRule::Fixed { sql_type, is_nullable } => {
                let is_nullable = match is_nullable {
                    Some(is_nullable) => Some(is_nullable),
                    None => Self::args_nullability(ctx, call)?,
                };
                Ok(ResultColumn { sql_type: Some(sql_type), is_nullable, ..Default::default() })
            }
            BuiltinRule::PassThrough { arg } => match call.args.get(arg) {
                Some(expr) => {
                    let mut column = ColumnProvenanceResolver::resolve(ctx, expr)?;
                    column.aggregate = None;
                    Ok(column)
                }
                None => Ok(ResultColumn::default()),
            },
            BuiltinRule::UnboundedText => Ok(ResultColumn::typed(SqlType::nvarchar_max(), true)),
            BuiltinRule::JsonQuery => JsonShapeExtractor::json_query(ctx, call),
            BuiltinRule::IsNull => NullHandlingResolver::isnull(ctx, &call.args),
            BuiltinRule::Coalesce => NullHandlingResolver::coalesce(ctx, &call.args),
            BuiltinRule::NullIf => match call.args.as_slice() {
                [left, right] => NullHandlingResolver::nullif(ctx, left, right),
                _ => Ok(ResultColumn { is_nullable: Some(true), ..Default::default() }),
            },
        }
    }

    /// Schema-qualified name of a user-defined function, defaulting the schema.
    pub fn qualified_name(ctx: &AnalysisContext, call: &FunctionCall) -> ObjectName {
        ObjectName {
            schema: Some(call.name.schema.clone().unwrap_or_else(|| ctx.default_schema().to_string())),
            ..call.name.clone()
        }
    }

    pub fn reference(ctx: &AnalysisContext, call: &FunctionCall) -> ObjectReference {
        ObjectReference::new(ObjectKind::Function, &Self::qualified_name(ctx, call))
    }

    pub fn is_user_defined(call: &FunctionCall) -> bool {
        call.name.schema.is_some() || BuiltinFunctions::classify(&call.name.name).is_none()
    }

    fn user_defined(ctx: &AnalysisContext, call: &FunctionCall) -> ResultColumn {
        ResultColumn { reference: Some(Self::reference(ctx, call)), ..Default::default() }
    }

    fn aggregate(ctx: &mut AnalysisContext, call: &FunctionCall) -> Result<ResultColumn, AnalyzerError> {
        let operand = match call.args.first().map(ScalarExpr::unnested) {
            None | Some(ScalarExpr::Wildcard) => AggregateOperand::default(),
            Some(expr) => {
                let resolved = ColumnProvenanceResolver::resolve(ctx, expr)?;
                let literal = LiteralResolver::literal_hint(expr);
                // a type that only literals supplied leaves the operand unknown
                let sql_type = match literal {
                    Some(_) if !Self::typed_beyond_literals(ctx, expr)? => None,
                    _ => resolved.sql_type,
                };
                AggregateOperand { sql_type, is_nullable: resolved.is_nullable, literal }
            }
        };
        let name = call.lowercase_name();
        let typing = AggregateRegistry::shared().infer_type(&name, &operand).unwrap_or_default();
        Ok(ResultColumn {
            sql_type: typing.sql_type,
            is_nullable: typing.is_nullable,
            aggregate: (!call.windowed).then_some(name),
            ..Default::default()
        })
    }

    /// Whether some non-literal leaf of `expr` has a known type.
    fn typed_beyond_literals(ctx: &mut AnalysisContext, expr: &ScalarExpr) -> Result<bool, AnalyzerError> {
        match expr {
            ScalarExpr::Literal(_) => Ok(false),
            ScalarExpr::Nested(inner) | ScalarExpr::Unary { expr: inner, .. } => Self::typed_beyond_literals(ctx, inner),
            ScalarExpr::Binary { left, right, .. } => {
                Ok(Self::typed_beyond_literals(ctx, left)? || Self::typed_beyond_literals(ctx, right)?)
            }
            ScalarExpr::Iif { then, otherwise, .. } => {
                Ok(Self::typed_beyond_literals(ctx, then)? || Self::typed_beyond_literals(ctx, otherwise)?)
            }
            ScalarExpr::Case { whens, else_result, .. } => {
                for branch in whens.iter().map(|when| &when.result).chain(else_result.as_deref()) {
                    if Self::typed_beyond_literals(ctx, branch)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            ScalarExpr::Coalesce(args) => {
                for arg in args {
                    if Self::typed_beyond_literals(ctx, arg)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            other => Ok(ColumnProvenanceResolver::resolve(ctx, other)?.sql_type.is_some()),
        }
    }

    fn args_nullability(ctx: &mut AnalysisContext, call: &FunctionCall) -> Result<Option<bool>, AnalyzerError> {
        // the leading datepart keyword is not an operand
        let skip = match call.lowercase_name().as_str() {
            "datediff" | "datediff_big" | "datepart" | "datename" => 1,
            _ => 0,
        };
        let mut is_nullable = Some(false);
        for arg in call.args.iter().skip(skip) {
            let resolved = ColumnProvenanceResolver::resolve(ctx, arg)?;
            is_nullable = TypePrecedence::either_nullable(is_nullable, resolved.is_nullable);
        }
        Ok(is_nullable)
    }
}
