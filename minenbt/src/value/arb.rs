use arbitrary::{Arbitrary, Result, Unstructured};

use super::{Compound, List, Tag, Value};
use crate::Kind;

fn arb_of(u: &mut Unstructured<'_>, kind: Kind) -> Result<Value> {
    Ok(match kind {
        Kind::End => return Err(arbitrary::Error::IncorrectFormat),
        Kind::Byte => Value::Byte(u.arbitrary()?),
        Kind::Short => Value::Short(u.arbitrary()?),
        Kind::Int => Value::Int(u.arbitrary()?),
        Kind::Long => Value::Long(u.arbitrary()?),
        Kind::Float => Value::Float(u.arbitrary()?),
        Kind::Double => Value::Double(u.arbitrary()?),
        Kind::ByteArray => Value::ByteArray(u.arbitrary()?),
        Kind::String => Value::String(u.arbitrary()?),
        Kind::List => Value::List(u.arbitrary()?),
        Kind::Compound => Value::Compound(u.arbitrary()?),
        Kind::IntArray => Value::IntArray(u.arbitrary()?),
        Kind::LongArray => Value::LongArray(u.arbitrary()?),
    })
}

impl<'a> Arbitrary<'a> for Value {
    fn arbitrary(u: &mut Unstructured<'a>) -> Result<Self> {
        let kind: Kind = u.arbitrary()?;
        arb_of(u, kind)
    }
}

impl<'a> Arbitrary<'a> for List {
    fn arbitrary(u: &mut Unstructured<'a>) -> Result<Self> {
        let kind: Kind = u.arbitrary()?;
        if kind == Kind::End {
            return Ok(List::new(Kind::End));
        }

        // Lists need to all be the same type.
        let len = u.arbitrary_len::<u8>()?;
        let mut elements = Vec::with_capacity(len);
        for _ in 0..len {
            elements.push(arb_of(u, kind)?);
        }
        Ok(List::from_parts(kind, elements))
    }
}

impl<'a> Arbitrary<'a> for Compound {
    fn arbitrary(u: &mut Unstructured<'a>) -> Result<Self> {
        u.arbitrary_iter::<Tag>()?.collect()
    }
}

impl<'a> Arbitrary<'a> for Tag {
    fn arbitrary(u: &mut Unstructured<'a>) -> Result<Self> {
        Ok(Tag {
            name: u.arbitrary()?,
            value: u.arbitrary()?,
        })
    }
}
