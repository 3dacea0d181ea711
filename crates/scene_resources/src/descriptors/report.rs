//! Human-readable capacity reports

use std::fmt;
use std::io::{self, Write};

use super::DescriptorPoolSizes;

/// Leading whitespace for one report line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Indentation(pub usize);

impl Indentation {
    /// Spaces added per nesting level
    pub const STEP: usize = 4;

    /// One level deeper
    #[must_use]
    pub const fn nested(self) -> Self {
        Self(self.0 + Self::STEP)
    }
}

impl fmt::Display for Indentation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:width$}", "", width = self.0)
    }
}

/// Write `sizes` as a counted block of `DescriptorPoolSize{ type, count }` lines
pub(crate) fn write_sizes(
    out: &mut impl Write,
    indent: Indentation,
    name: &str,
    sizes: &DescriptorPoolSizes,
) -> io::Result<()> {
    writeln!(out, "{indent}{name} {} {{", sizes.len())?;
    let inner = indent.nested();
    for dps in sizes {
        writeln!(out, "{inner}DescriptorPoolSize{{ {:?}, {} }}", dps.ty, dps.descriptor_count)?;
    }
    writeln!(out, "{indent}}}")
}

/// Write a named `{ num_sets, sizes }` block
pub(crate) fn write_capacity(
    out: &mut impl Write,
    indent: Indentation,
    name: &str,
    num_sets: u32,
    sizes: &DescriptorPoolSizes,
) -> io::Result<()> {
    writeln!(out, "{indent}{name} {{")?;
    let inner = indent.nested();
    writeln!(out, "{inner}num_sets {num_sets}")?;
    write_sizes(out, inner, "descriptor_pool_sizes", sizes)?;
    writeln!(out, "{indent}}}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use ash::vk;

    #[test]
    fn test_indentation_display() {
        assert_eq!(Indentation(0).to_string(), "");
        assert_eq!(Indentation(0).nested().nested().to_string(), "        ");
    }

    #[test]
    fn test_write_capacity_block() {
        let sizes: DescriptorPoolSizes = [(vk::DescriptorType::UNIFORM_BUFFER, 8)].into_iter().collect();
        let mut out = Vec::new();
        write_capacity(&mut out, Indentation(2), "used", 3, &sizes).unwrap();

        let text = String::from_utf8(out).unwrap();
        let expected = "  used {\n      num_sets 3\n      descriptor_pool_sizes 1 {\n          DescriptorPoolSize{ UNIFORM_BUFFER, 8 }\n      }\n  }\n";
        assert_eq!(text, expected);
    }
}
