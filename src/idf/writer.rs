//! IDF object formatting.

/// Column at which field comments start.
const COMMENT_COLUMN: usize = 25;

/// Returns the IDF text for one EnergyPlus object.
///
/// Fields are written one per line in the order given. When `comments` is
/// supplied it must match `values` in length, and each comment is aligned
/// to a fixed column after its value.
///
/// # Arguments
///
/// * `object_type` - IDF class name (e.g. `WindowMaterial:Glazing`)
/// * `values` - Field values in IDF order
/// * `comments` - Optional field descriptions, one per value
///
/// # Examples
///
/// ```
/// use honeybee_energy::idf::generate_idf_string;
///
/// let text = generate_idf_string("Construction", &["Wall", "Brick"], None);
/// assert_eq!(text, "Construction,\n Wall,\n Brick;");
/// ```
pub fn generate_idf_string<S: AsRef<str>>(
    object_type: &str,
    values: &[S],
    comments: Option<&[&str]>,
) -> String {
    let Some((last, body)) = values.split_last() else {
        return format!("{object_type};");
    };
    let last = last.as_ref();

    match comments {
        Some(comments) => {
            let comment_at = |i: usize| comments.get(i).copied().unwrap_or("");
            let lines: Vec<String> = body
                .iter()
                .enumerate()
                .map(|(i, v)| {
                    let v = v.as_ref();
                    format!("{v},{}!- {}", padding(v), comment_at(i))
                })
                .collect();
            let last_comment = comment_at(values.len() - 1);
            let mut out = format!("{object_type},\n {}", lines.join("\n "));
            if body.is_empty() {
                out.push_str(&format!("{last};{}!- {last_comment}", padding(last)));
            } else if last_comment.is_empty() {
                out.push_str(&format!("\n {last};"));
            } else {
                out.push_str(&format!("\n {last};{}!- {last_comment}", padding(last)));
            }
            out
        }
        None => {
            let lines: Vec<String> = body.iter().map(|v| format!("{},", v.as_ref())).collect();
            let mut out = format!("{object_type},\n {}", lines.join("\n "));
            if body.is_empty() {
                out.push_str(&format!("{last};"));
            } else {
                out.push_str(&format!("\n {last};"));
            }
            out
        }
    }
}

fn padding(value: &str) -> String {
    let width = COMMENT_COLUMN.saturating_sub(value.chars().count()).max(1);
    " ".repeat(width)
}

/// Formats an optional number, leaving the field blank when absent.
///
/// Numbers use the shortest form that reads back to the same value, so
/// `0.1` stays `0.1` and `1.0` becomes `1`.
pub fn opt_num(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// IDF spelling of a boolean switch.
pub fn yes_no(flag: bool) -> &'static str {
    if flag { "Yes" } else { "No" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commented_object_aligns_comments() {
        let text = generate_idf_string(
            "Material:NoMass",
            &["Insulation", "MediumRough", "2.5"],
            Some(&["name", "roughness", "thermal resistance"]),
        );
        let expected = "Material:NoMass,\n Insulation,               !- name\n \
                        MediumRough,              !- roughness\n \
                        2.5;                      !- thermal resistance";
        assert_eq!(text, expected);
    }

    #[test]
    fn single_value_stays_on_first_line() {
        let text = generate_idf_string("Zone", &["Office"], Some(&["name"]));
        assert_eq!(text, "Zone,\n Office;                   !- name");
    }

    #[test]
    fn empty_last_comment_drops_marker() {
        let text = generate_idf_string(
            "Shading:Building:Detailed",
            &["S", "4", "0, 0, 0"],
            Some(&["name", "number of vertices", ""]),
        );
        assert!(text.ends_with("\n 0, 0, 0;"));
    }

    #[test]
    fn long_values_get_one_space() {
        let long = "x".repeat(30);
        let text = generate_idf_string("Zone", &[long.as_str(), "1"], Some(&["name", "n"]));
        assert!(text.contains(&format!("{long}, !- name")));
    }

    #[test]
    fn numbers_use_shortest_form() {
        assert_eq!(opt_num(Some(0.1)), "0.1");
        assert_eq!(opt_num(Some(1.0)), "1");
        assert_eq!(opt_num(None), "");
    }

    #[test]
    fn uncommented_object() {
        let text = generate_idf_string("Timestep", &["6"], None);
        assert_eq!(text, "Timestep,\n 6;");
    }
}
