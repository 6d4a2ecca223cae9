//! Text layout of a dump tree.

use super::{DumpConfig, DumpNode};
use std::fmt::{self, Write};

/// Significant digits of a formatted float
const FLOAT_PRECISION: i32 = 6;

/// Formats a float like C's `%g`: six significant digits, no trailing zeros,
/// exponent notation outside `1e-4 ..= 1e6`
pub fn format_float(value: f32) -> String {
    let value = f64::from(value);
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value < 0.0 { "-inf" } else { "inf" }.to_string();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    // Rounding to the target precision decides the exponent, e.g. 999999.5
    // becomes 1e+06.
    let scientific = format!("{:.*e}", (FLOAT_PRECISION - 1) as usize, value);
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((&scientific, "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if exponent < -4 || exponent >= FLOAT_PRECISION {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", trim_fraction(mantissa), sign, exponent.abs())
    } else {
        let decimals = (FLOAT_PRECISION - 1 - exponent) as usize;
        trim_fraction(&format!("{value:.decimals$}")).to_string()
    }
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

/// Writes `node` and its subtree at `indent` levels.
///
/// A leaf prints `name = value`. A node with children prints on one line as
/// `name = { a=1, b=2 }` when every child is a leaf and the items stay under
/// the configured line width; otherwise each child gets its own line inside
/// braces. The root (indent 0) is never braced.
pub fn render(
    node: &DumpNode,
    out: &mut impl Write,
    indent: usize,
    config: &DumpConfig,
) -> fmt::Result {
    write_indent(out, indent, config)?;

    if node.is_leaf() {
        if !node.name.is_empty() {
            writeln!(out, "{} = {}", node.name, node.value)?;
        }
        return Ok(());
    }

    if !node.name.is_empty() {
        write!(out, "{} =", node.name)?;
    }

    if fits_on_line(node, config.line_width) {
        out.write_str(" { ")?;
        for (i, child) in node.children.iter().enumerate() {
            if i > 0 {
                out.write_str(", ")?;
            }
            if child.is_array_item {
                out.write_str(&child.value)?;
            } else {
                write!(out, "{}={}", child.name, child.value)?;
            }
        }
        return out.write_str(" }\n");
    }

    out.write_char('\n')?;
    if indent > 0 {
        write_indent(out, indent, config)?;
        out.write_str("{\n")?;
    }
    for child in &node.children {
        render(child, out, indent + 1, config)?;
    }
    if indent > 0 {
        write_indent(out, indent, config)?;
        out.write_str("}\n")?;
    }
    Ok(())
}

fn fits_on_line(node: &DumpNode, line_width: usize) -> bool {
    let mut total = 0;
    for child in &node.children {
        if !child.is_leaf() {
            return false;
        }
        total += child.value.len() + 2;
        if !child.is_array_item {
            total += child.name.len();
        }
        if total >= line_width {
            return false;
        }
    }
    true
}

fn write_indent(out: &mut impl Write, indent: usize, config: &DumpConfig) -> fmt::Result {
    for _ in 0..indent {
        out.write_str(&config.indent_str)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn leaf(name: &str, value: &str) -> DumpNode {
        DumpNode {
            name: name.to_string(),
            value: value.to_string(),
            ..Default::default()
        }
    }

    fn branch(name: &str, children: Vec<DumpNode>) -> DumpNode {
        DumpNode {
            name: name.to_string(),
            children,
            ..Default::default()
        }
    }

    fn rendered(node: &DumpNode) -> String {
        let mut out = String::new();
        render(node, &mut out, 0, &DumpConfig::new()).unwrap();
        out
    }

    #[test]
    fn test_format_float() {
        assert_eq!(format_float(0.0), "0");
        assert_eq!(format_float(1.0), "1");
        assert_eq!(format_float(-2.5), "-2.5");
        assert_eq!(format_float(0.1), "0.1");
        assert_eq!(format_float(1.0 / 3.0), "0.333333");
        assert_eq!(format_float(123456.0), "123456");
        assert_eq!(format_float(1234567.0), "1.23457e+06");
        assert_eq!(format_float(0.0001), "0.0001");
        assert_eq!(format_float(0.00001), "1e-05");
        assert_eq!(format_float(f32::INFINITY), "inf");
    }

    #[test]
    fn test_render_single_line_threshold() {
        // One item costs name + value + 2 columns: 1 + 76 + 2 = 79.
        let fits = branch("", vec![leaf("N", &"a".repeat(76))]);
        assert_eq!(rendered(&fits), format!(" {{ N={} }}\n", "a".repeat(76)));

        let overflows = branch("", vec![leaf("N", &"a".repeat(77))]);
        assert_eq!(rendered(&overflows), format!("\n    N = {}\n", "a".repeat(77)));
    }

    #[test]
    fn test_render_array_items_omit_names() {
        let items = (0..3)
            .map(|i| DumpNode {
                is_array_item: true,
                ..leaf(&format!("Slots[{i}]"), &i.to_string())
            })
            .collect();
        let root = branch("", vec![branch("Slots[3]", items), leaf("Tag", "1")]);
        assert_eq!(rendered(&root), "\n    Slots[3] = { 0, 1, 2 }\n    Tag = 1\n");
    }

    #[test]
    fn test_render_nested_block() {
        fn vector(name: &str) -> DumpNode {
            branch(name, vec![leaf("X", "1"), leaf("Y", "2"), leaf("Z", "3")])
        }

        let root = branch(
            "",
            vec![
                branch("Frame", vec![vector("Origin"), vector("XAxis")]),
                leaf("Scale", "0.5"),
            ],
        );
        let expected = "
    Frame =
    {
        Origin = { X=1, Y=2, Z=3 }
        XAxis = { X=1, Y=2, Z=3 }
    }
    Scale = 0.5
";
        assert_eq!(rendered(&root), expected);
    }

    #[test]
    fn test_render_custom_indent_and_width() {
        let config = DumpConfig::new().indent_str("\t").line_width(10);
        let vector = branch("V", vec![leaf("X", "1"), leaf("Y", "22"), leaf("Z", "333")]);
        let root = branch("", vec![vector]);
        let mut out = String::new();
        render(&root, &mut out, 0, &config).unwrap();
        assert_eq!(out, "\n\tV =\n\t{\n\t\tX = 1\n\t\tY = 22\n\t\tZ = 333\n\t}\n");
    }
}
