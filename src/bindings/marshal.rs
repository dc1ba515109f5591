//! Typed argument marshaling between a Lua call frame and native calls.
//!
//! Each binding declares its parameters as a plain struct implementing
//! [`FromCallFrame`]. Extraction either yields the whole struct or a
//! [`BindingError`]; nothing is forwarded to the driver until it succeeds.
//!
//! Coercion mirrors `luaL_checknumber` / `luaL_checkinteger`: numeric
//! strings are accepted, floats only count as integers when exact.

use crate::core::{BindingError, BindingResult};
use mlua::Value;

/// The positional arguments of one binding call.
pub struct CallFrame<'a, 'lua> {
    function: &'static str,
    args: &'a [Value<'lua>],
}

impl<'a, 'lua> CallFrame<'a, 'lua> {
    pub fn new(function: &'static str, args: &'a [Value<'lua>]) -> Self {
        Self { function, args }
    }

    pub fn function(&self) -> &'static str {
        self.function
    }

    /// Surplus arguments are ignored, as Lua's own C functions do.
    pub fn require_arity(&self, expected: usize) -> BindingResult<()> {
        if self.args.len() < expected {
            return Err(BindingError::ArgumentCount {
                function: self.function,
                expected,
                got: self.args.len(),
            });
        }
        Ok(())
    }

    /// Argument at 1-based `position`, coerced to a float.
    pub fn number(&self, position: usize) -> BindingResult<f64> {
        match self.slot(position)? {
            Value::Integer(i) => Ok(*i as f64),
            Value::Number(n) => Ok(*n),
            Value::String(s) => match s.to_str().ok().and_then(parse_numeral) {
                Some(Numeral::Integer(i)) => Ok(i as f64),
                Some(Numeral::Float(n)) => Ok(n),
                None => Err(self.type_error(position, "number", "string")),
            },
            other => Err(self.type_error(position, "number", other.type_name())),
        }
    }

    /// Argument at 1-based `position`, coerced to an integer.
    pub fn integer(&self, position: usize) -> BindingResult<i64> {
        match self.slot(position)? {
            Value::Integer(i) => Ok(*i),
            Value::Number(n) => self.exact_integer(position, *n),
            Value::String(s) => match s.to_str().ok().and_then(parse_numeral) {
                Some(Numeral::Integer(i)) => Ok(i),
                Some(Numeral::Float(n)) => self.exact_integer(position, n),
                None => Err(self.type_error(position, "number", "string")),
            },
            other => Err(self.type_error(position, "number", other.type_name())),
        }
    }

    /// Integer argument that must fit a `GLbitfield`.
    pub fn bitfield(&self, position: usize) -> BindingResult<u32> {
        let value = self.integer(position)?;
        u32::try_from(value).map_err(|_| BindingError::OutOfRange {
            function: self.function,
            position,
            value,
        })
    }

    fn slot(&self, position: usize) -> BindingResult<&Value<'lua>> {
        position
            .checked_sub(1)
            .and_then(|index| self.args.get(index))
            .ok_or(BindingError::ArgumentCount {
                function: self.function,
                expected: position,
                got: self.args.len(),
            })
    }

    fn exact_integer(&self, position: usize, n: f64) -> BindingResult<i64> {
        // 2^63 is the first float past i64::MAX.
        const LIMIT: f64 = 9_223_372_036_854_775_808.0;
        if n.fract() == 0.0 && n >= -LIMIT && n < LIMIT {
            Ok(n as i64)
        } else {
            Err(BindingError::NotAnInteger {
                function: self.function,
                position,
            })
        }
    }

    fn type_error(&self, position: usize, expected: &'static str, got: &str) -> BindingError {
        BindingError::ArgumentType {
            function: self.function,
            position,
            expected,
            got: got.to_string(),
        }
    }
}

/// A fixed parameter tuple for one binding function.
pub trait FromCallFrame: Sized {
    /// Number of required positional arguments.
    const ARITY: usize;

    fn extract(frame: &CallFrame<'_, '_>) -> BindingResult<Self>;

    fn from_frame(frame: &CallFrame<'_, '_>) -> BindingResult<Self> {
        frame.require_arity(Self::ARITY)?;
        Self::extract(frame)
    }
}

/// `clearColor(r, g, b, a)`; no range check, the driver clamps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClearColorArgs {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
    pub alpha: f32,
}

impl FromCallFrame for ClearColorArgs {
    const ARITY: usize = 4;

    fn extract(frame: &CallFrame<'_, '_>) -> BindingResult<Self> {
        Ok(Self {
            red: frame.number(1)? as f32,
            green: frame.number(2)? as f32,
            blue: frame.number(3)? as f32,
            alpha: frame.number(4)? as f32,
        })
    }
}

/// `clear(mask)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearArgs {
    pub mask: u32,
}

impl FromCallFrame for ClearArgs {
    const ARITY: usize = 1;

    fn extract(frame: &CallFrame<'_, '_>) -> BindingResult<Self> {
        Ok(Self {
            mask: frame.bitfield(1)?,
        })
    }
}

/// `genVertexArrays(count)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenVertexArraysArgs {
    pub count: usize,
}

impl FromCallFrame for GenVertexArraysArgs {
    const ARITY: usize = 1;

    fn extract(frame: &CallFrame<'_, '_>) -> BindingResult<Self> {
        let count = frame.integer(1)?;
        if count < 0 {
            return Err(BindingError::NegativeCount {
                function: frame.function(),
                count,
            });
        }
        let count = usize::try_from(count).map_err(|_| BindingError::OutOfRange {
            function: frame.function(),
            position: 1,
            value: count,
        })?;
        Ok(Self { count })
    }
}

#[derive(Debug, PartialEq)]
enum Numeral {
    Integer(i64),
    Float(f64),
}

/// Lua numeral syntax: decimal integers and floats, `0x` hex integers
/// (wrapping modulo 2^64) and `0x` hex floats with an optional binary
/// `p` exponent. Surrounding whitespace is allowed; `inf`/`nan` spellings
/// are not.
fn parse_numeral(text: &str) -> Option<Numeral> {
    let text = text.trim();
    let (negative, body) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };

    if let Some(hex) = body.strip_prefix("0x").or_else(|| body.strip_prefix("0X")) {
        return Some(match parse_hex(hex)? {
            Numeral::Integer(i) if negative => Numeral::Integer(i.wrapping_neg()),
            Numeral::Float(n) if negative => Numeral::Float(-n),
            numeral => numeral,
        });
    }

    if body.is_empty()
        || !body
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
    {
        return None;
    }

    if let Ok(value) = text.parse::<i64>() {
        return Some(Numeral::Integer(value));
    }
    text.parse::<f64>().ok().map(Numeral::Float)
}

fn parse_hex(digits: &str) -> Option<Numeral> {
    let (mantissa, exponent) = match digits.find(|c| c == 'p' || c == 'P') {
        Some(at) => (&digits[..at], Some(&digits[at + 1..])),
        None => (digits, None),
    };

    if exponent.is_none() && !mantissa.contains('.') {
        if mantissa.is_empty() {
            return None;
        }
        let mut value = 0i64;
        for c in mantissa.chars() {
            value = value
                .wrapping_mul(16)
                .wrapping_add(i64::from(c.to_digit(16)?));
        }
        return Some(Numeral::Integer(value));
    }

    let (whole, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    let mut value = 0f64;
    for c in whole.chars().chain(fraction.chars()) {
        value = value * 16.0 + f64::from(c.to_digit(16)?);
    }

    // Binary exponent, shifted by four bits per fractional digit.
    let mut scale = -4 * fraction.len() as i64;
    if let Some(exponent) = exponent {
        let (sign, magnitude) = match exponent.strip_prefix('-') {
            Some(rest) => (-1, rest),
            None => (1, exponent.strip_prefix('+').unwrap_or(exponent)),
        };
        if magnitude.is_empty() || !magnitude.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let magnitude: i64 = magnitude.parse().unwrap_or(i64::MAX);
        scale = scale.saturating_add(sign * magnitude);
    }
    let scale = scale.clamp(-2200, 2200) as i32;
    Some(Numeral::Float(value * 2f64.powi(scale)))
}
