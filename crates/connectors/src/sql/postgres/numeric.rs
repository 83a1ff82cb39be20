//! Binary `NUMERIC` codec backed by `BigDecimal`, so values of any precision
//! survive the round trip.
//!
//! Wire layout: `ndigits`, `weight`, `sign`, `dscale` (all 16 bit), then
//! `ndigits` base-10000 digits. The first digit is worth `10000^weight`.

use bigdecimal::BigDecimal;
use bytes::{BufMut, BytesMut};
use std::{error::Error, str::FromStr};
use tokio_postgres::types::{FromSql, IsNull, ToSql, Type, to_sql_checked};

type BoxError = Box<dyn Error + Sync + Send>;

const SIGN_POS: u16 = 0x0000;
const SIGN_NEG: u16 = 0x4000;
const SIGN_NAN: u16 = 0xC000;
const SIGN_PINF: u16 = 0xD000;
const SIGN_NINF: u16 = 0xF000;

#[derive(Debug, Clone, PartialEq)]
pub enum PgNumeric {
    Finite(BigDecimal),
    /// `NaN` and the infinities, which `BigDecimal` cannot hold.
    Special(f64),
}

fn read_u16(raw: &[u8], at: usize) -> Result<u16, BoxError> {
    raw.get(at..at + 2)
        .map(|b| u16::from_be_bytes([b[0], b[1]]))
        .ok_or_else(|| "truncated numeric value".into())
}

impl<'a> FromSql<'a> for PgNumeric {
    fn from_sql(_: &Type, raw: &'a [u8]) -> Result<Self, BoxError> {
        let ndigits = read_u16(raw, 0)? as usize;
        let weight = read_u16(raw, 2)? as i16 as i64;
        let sign = read_u16(raw, 4)?;
        let dscale = read_u16(raw, 6)? as i64;

        let negative = match sign {
            SIGN_POS => false,
            SIGN_NEG => true,
            SIGN_NAN => return Ok(PgNumeric::Special(f64::NAN)),
            SIGN_PINF => return Ok(PgNumeric::Special(f64::INFINITY)),
            SIGN_NINF => return Ok(PgNumeric::Special(f64::NEG_INFINITY)),
            other => return Err(format!("invalid numeric sign {other:#06x}").into()),
        };

        if ndigits == 0 {
            return Ok(PgNumeric::Finite(BigDecimal::from(0).with_scale(dscale)));
        }

        let mut text = String::with_capacity(ndigits * 4 + 8);
        if negative {
            text.push('-');
        }
        for i in 0..ndigits {
            let digit = read_u16(raw, 8 + i * 2)?;
            if digit > 9999 {
                return Err(format!("invalid numeric digit {digit}").into());
            }
            text.push_str(&format!("{digit:04}"));
        }
        let exponent = 4 * (weight - ndigits as i64 + 1);
        text.push_str(&format!("e{exponent}"));

        Ok(PgNumeric::Finite(
            BigDecimal::from_str(&text)?.with_scale(dscale),
        ))
    }

    fn accepts(ty: &Type) -> bool {
        *ty == Type::NUMERIC
    }
}

impl ToSql for PgNumeric {
    fn to_sql(&self, _: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
        let value = match self {
            PgNumeric::Finite(v) => v,
            PgNumeric::Special(f) => {
                let sign = if f.is_nan() {
                    SIGN_NAN
                } else if f.is_sign_positive() {
                    SIGN_PINF
                } else {
                    SIGN_NINF
                };
                for field in [0, 0, sign, 0] {
                    out.put_u16(field);
                }
                return Ok(IsNull::No);
            }
        };

        let (int, scale) = value.as_bigint_and_exponent();
        let mut digits = int.to_string();
        let negative = digits.starts_with('-');
        if negative {
            digits.remove(0);
        }

        // Shift so `scale` counts fractional digits and is never negative.
        let scale = if scale < 0 {
            digits.push_str(&"0".repeat(scale.unsigned_abs() as usize));
            0
        } else {
            scale as usize
        };
        if digits.len() <= scale {
            digits.insert_str(0, &"0".repeat(scale + 1 - digits.len()));
        }

        // Align both sides of the decimal point to base-10000 groups.
        let int_len = digits.len() - scale;
        let lead = (4 - int_len % 4) % 4;
        let trail = (4 - scale % 4) % 4;
        let padded = format!("{}{}{}", "0".repeat(lead), digits, "0".repeat(trail));

        let mut groups: Vec<u16> = padded
            .as_bytes()
            .chunks(4)
            .map(|chunk| chunk.iter().fold(0u16, |acc, b| acc * 10 + u16::from(b - b'0')))
            .collect();
        let mut weight = ((int_len + lead) / 4) as i64 - 1;

        let leading_zeros = groups.iter().take_while(|g| **g == 0).count();
        groups.drain(..leading_zeros);
        weight -= leading_zeros as i64;
        while groups.last() == Some(&0) {
            groups.pop();
        }
        if groups.is_empty() {
            weight = 0;
        }

        out.put_u16(u16::try_from(groups.len())?);
        out.put_i16(i16::try_from(weight)?);
        out.put_u16(if negative && !groups.is_empty() { SIGN_NEG } else { SIGN_POS });
        out.put_u16(u16::try_from(scale)?);
        for group in groups {
            out.put_u16(group);
        }
        Ok(IsNull::No)
    }

    fn accepts(ty: &Type) -> bool {
        *ty == Type::NUMERIC
    }

    to_sql_checked!();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wire(fields: &[u16]) -> Vec<u8> {
        fields.iter().flat_map(|f| f.to_be_bytes()).collect()
    }

    fn decimal(text: &str) -> BigDecimal {
        BigDecimal::from_str(text).unwrap()
    }

    fn decode(raw: &[u8]) -> PgNumeric {
        PgNumeric::from_sql(&Type::NUMERIC, raw).unwrap()
    }

    #[test]
    fn test_decode_fraction() {
        // 123.45
        let raw = wire(&[2, 0, SIGN_POS, 2, 123, 4500]);
        assert_eq!(decode(&raw), PgNumeric::Finite(decimal("123.45")));

        // -0.5
        let raw = wire(&[1, (-1i16) as u16, SIGN_NEG, 1, 5000]);
        assert_eq!(decode(&raw), PgNumeric::Finite(decimal("-0.5")));
    }

    #[test]
    fn test_decode_beyond_28_digits() {
        // 123456789012345678901234567890
        let raw = wire(&[8, 7, SIGN_POS, 0, 12, 3456, 7890, 1234, 5678, 9012, 3456, 7890]);
        assert_eq!(
            decode(&raw),
            PgNumeric::Finite(decimal("123456789012345678901234567890"))
        );
    }

    #[test]
    fn test_decode_specials_and_errors() {
        assert!(matches!(
            decode(&wire(&[0, 0, SIGN_NAN, 0])),
            PgNumeric::Special(f) if f.is_nan()
        ));
        assert_eq!(
            decode(&wire(&[0, 0, SIGN_NINF, 0])),
            PgNumeric::Special(f64::NEG_INFINITY)
        );
        assert_eq!(decode(&wire(&[0, 0, SIGN_POS, 0])), PgNumeric::Finite(decimal("0")));
        assert!(PgNumeric::from_sql(&Type::NUMERIC, &[0, 1]).is_err());
        assert!(PgNumeric::from_sql(&Type::NUMERIC, &wire(&[1, 0, SIGN_POS, 0])).is_err());
    }

    #[test]
    fn test_encode_matches_server_layout() {
        let mut out = BytesMut::new();
        PgNumeric::Finite(decimal("-1234567.0089"))
            .to_sql(&Type::NUMERIC, &mut out)
            .unwrap();
        assert_eq!(out.as_ref(), wire(&[3, 1, SIGN_NEG, 4, 123, 4567, 89]).as_slice());

        let mut out = BytesMut::new();
        PgNumeric::Finite(decimal("1E+30"))
            .to_sql(&Type::NUMERIC, &mut out)
            .unwrap();
        assert_eq!(decode(&out), PgNumeric::Finite(decimal("1000000000000000000000000000000")));
    }
}
