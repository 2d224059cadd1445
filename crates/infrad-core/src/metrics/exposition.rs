//! Prometheus text exposition format rendering (version 0.0.4).

use std::fmt::Write;

use super::MetricFamilySample;

/// Content type of the rendered payload.
pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4";

/// Renders family snapshots into the text exposition format.
///
/// Families without samples are skipped entirely (no dangling `# TYPE`
/// lines). Label values are escaped per the format rules.
pub fn render_text(families: &[MetricFamilySample]) -> String {
    let mut out = String::with_capacity(families.len() * 128);
    for family in families {
        if family.samples.is_empty() {
            continue;
        }
        out.push_str("# HELP ");
        out.push_str(&family.name);
        out.push(' ');
        escape_help(&mut out, family.help);
        out.push('\n');
        out.push_str("# TYPE ");
        out.push_str(&family.name);
        out.push(' ');
        out.push_str(family.kind.as_str());
        out.push('\n');
        for sample in &family.samples {
            write_sample(&mut out, &family.name, &sample.labels, sample.value);
        }
    }
    out
}

fn write_sample(out: &mut String, name: &str, labels: &[(String, String)], value: f64) {
    out.push_str(name);
    if !labels.is_empty() {
        out.push('{');
        for (i, (key, val)) in labels.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            out.push_str(key);
            out.push_str("=\"");
            escape_label_value(out, val);
            out.push('"');
        }
        out.push('}');
    }
    out.push(' ');
    write_value(out, value);
    out.push('\n');
}

/// Label values escape backslash, double quote, and newline.
fn escape_label_value(out: &mut String, value: &str) {
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
}

/// Help text escapes backslash and newline only.
fn escape_help(out: &mut String, help: &str) {
    for c in help.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
}

fn write_value(out: &mut String, value: f64) {
    if value.is_nan() {
        out.push_str("NaN");
    } else if value == f64::INFINITY {
        out.push_str("+Inf");
    } else if value == f64::NEG_INFINITY {
        out.push_str("-Inf");
    } else {
        // f64 Display prints integral values without a trailing ".0".
        let _ = write!(out, "{}", value);
    }
}

#[cfg(test)]
mod tests {
    use super::super::{MetricKind, MetricSample};
    use super::*;

    fn sample(labels: &[(&str, &str)], value: f64) -> MetricSample {
        MetricSample {
            labels: labels
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            value,
        }
    }

    #[test]
    fn test_render_gauge_with_labels() {
        let families = vec![MetricFamilySample {
            name: "node_filesystem_size_bytes".to_string(),
            help: "Filesystem size in bytes",
            kind: MetricKind::Gauge,
            samples: vec![sample(
                &[("device", "/dev/sda1"), ("fstype", "ext4"), ("mountpoint", "/")],
                1024.0,
            )],
        }];
        let text = render_text(&families);
        assert_eq!(
            text,
            "# HELP node_filesystem_size_bytes Filesystem size in bytes\n\
             # TYPE node_filesystem_size_bytes gauge\n\
             node_filesystem_size_bytes{device=\"/dev/sda1\",fstype=\"ext4\",mountpoint=\"/\"} 1024\n"
        );
    }

    #[test]
    fn test_render_counter_without_labels() {
        let families = vec![MetricFamilySample {
            name: "requests_total".to_string(),
            help: "Requests",
            kind: MetricKind::Counter,
            samples: vec![sample(&[], 3.5)],
        }];
        let text = render_text(&families);
        assert!(text.contains("# TYPE requests_total counter\n"));
        assert!(text.contains("requests_total 3.5\n"));
    }

    #[test]
    fn test_label_value_escaping() {
        let families = vec![MetricFamilySample {
            name: "m".to_string(),
            help: "h",
            kind: MetricKind::Gauge,
            samples: vec![sample(&[("name", "a\\b\"c\nd")], 1.0)],
        }];
        let text = render_text(&families);
        assert!(text.contains("m{name=\"a\\\\b\\\"c\\nd\"} 1\n"));
    }

    #[test]
    fn test_empty_family_is_skipped() {
        let families = vec![MetricFamilySample {
            name: "empty".to_string(),
            help: "h",
            kind: MetricKind::Gauge,
            samples: Vec::new(),
        }];
        assert_eq!(render_text(&families), "");
    }

    #[test]
    fn test_special_float_values() {
        let families = vec![MetricFamilySample {
            name: "m".to_string(),
            help: "h",
            kind: MetricKind::Gauge,
            samples: vec![
                sample(&[("v", "inf")], f64::INFINITY),
                sample(&[("v", "nan")], f64::NAN),
                sample(&[("v", "neg")], f64::NEG_INFINITY),
            ],
        }];
        let text = render_text(&families);
        assert!(text.contains("m{v=\"inf\"} +Inf\n"));
        assert!(text.contains("m{v=\"nan\"} NaN\n"));
        assert!(text.contains("m{v=\"neg\"} -Inf\n"));
    }
}
