//! Indented, human readable rendering of a tree.
//!
//! ```text
//! TAG_Compound(""): (2 entries) {
//!    TAG_Int("a"): 5
//!    TAG_List("Pos"): (2 entries) {
//!       TAG_Double: 1.5
//!       TAG_Double: -3
//!    }
//! }
//! ```
use std::fmt::{self, Display, Formatter};

use super::{Tag, Value};

const INDENT: usize = 3;

impl Display for Tag {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_tag(f, self, 0)
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_value(f, self, 0)
    }
}

fn indent(f: &mut Formatter<'_>, depth: usize) -> fmt::Result {
    write!(f, "{:width$}", "", width = depth * INDENT)
}

fn write_tag(f: &mut Formatter<'_>, tag: &Tag, depth: usize) -> fmt::Result {
    indent(f, depth)?;
    write!(f, "{}({:?}): ", tag.kind(), tag.name())?;
    write_value(f, tag.value(), depth)?;
    writeln!(f)
}

fn write_value(f: &mut Formatter<'_>, value: &Value, depth: usize) -> fmt::Result {
    match value {
        Value::Byte(v) => write!(f, "0x{:02X} ({})", *v as u8, v),
        Value::Short(v) => write!(f, "{}", v),
        Value::Int(v) => write!(f, "{}", v),
        Value::Long(v) => write!(f, "{}", v),
        Value::Float(v) => write!(f, "{}", v),
        Value::Double(v) => write!(f, "{}", v),
        Value::String(v) => write!(f, "{:?}", v),
        Value::ByteArray(v) => {
            write!(f, "({} entries) [", v.len())?;
            for (i, b) in v.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{:02X}", b)?;
            }
            f.write_str("]")
        }
        Value::IntArray(v) => write!(f, "({} entries) {:?}", v.len(), v),
        Value::LongArray(v) => write!(f, "({} entries) {:?}", v.len(), v),
        Value::Compound(c) => {
            writeln!(f, "({} entries) {{", c.len())?;
            for child in c {
                write_tag(f, child, depth + 1)?;
            }
            indent(f, depth)?;
            f.write_str("}")
        }
        Value::List(l) => {
            writeln!(f, "({} entries) {{", l.len())?;
            for element in l {
                indent(f, depth + 1)?;
                write!(f, "{}: ", l.kind())?;
                write_value(f, element, depth + 1)?;
                writeln!(f)?;
            }
            indent(f, depth)?;
            f.write_str("}")
        }
    }
}
