use crate::sql::postgres::numeric::PgNumeric;
use bigdecimal::BigDecimal;
use bytes::BytesMut;
use model::core::value::Value;
use std::error::Error;
use tokio_postgres::types::{IsNull, Json as PgJson, ToSql, Type, to_sql_checked};

type Param = Box<dyn ToSql + Sync + Send>;

/// An integer literal bound at the width of the column it is compared with,
/// so `cost > 4` works against `int2`, `int4`, `int8` and `numeric` alike.
#[derive(Debug)]
struct PgInt(i64);

impl ToSql for PgInt {
    fn to_sql(
        &self,
        ty: &Type,
        out: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        match *ty {
            Type::INT2 => i16::try_from(self.0)?.to_sql(ty, out),
            Type::INT4 => i32::try_from(self.0)?.to_sql(ty, out),
            Type::NUMERIC => PgNumeric::Finite(BigDecimal::from(self.0)).to_sql(ty, out),
            _ => self.0.to_sql(ty, out),
        }
    }

    fn accepts(ty: &Type) -> bool {
        matches!(*ty, Type::INT2 | Type::INT4 | Type::INT8 | Type::NUMERIC)
    }

    to_sql_checked!();
}

fn param(value: Value) -> Param {
    match value {
        Value::Int(v) => Box::new(PgInt(v)),
        Value::Float(v) => Box::new(v),
        Value::Decimal(v) => Box::new(PgNumeric::Finite(v)),
        Value::String(v) => Box::new(v),
        Value::Boolean(v) => Box::new(v),
        Value::Json(v) => Box::new(PgJson(v)),
        Value::Bytes(v) => Box::new(v),
        Value::Date(v) => Box::new(v),
        Value::Timestamp(v) => Box::new(v),
        Value::TimestampNaive(v) => Box::new(v),
        Value::Null => Box::new(None::<String>),
    }
}

/// Bind parameters for one statement, in placeholder order.
pub struct PgParams(Vec<Param>);

impl PgParams {
    pub fn new(values: Vec<Value>) -> Self {
        Self(values.into_iter().map(param).collect())
    }

    pub fn as_refs(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.0
            .iter()
            .map(|p| &**p as &(dyn ToSql + Sync))
            .collect()
    }
}
