//! Naming of the leading yield curve factors from their loading patterns.

use std::collections::BTreeMap;

/// Names given to the first four components, in order.
pub const FACTOR_NAMES: [&str; 4] = ["Level", "Slope", "Curvature", "Butterfly"];

/// Labels the leading components.
///
/// - Level: every loading has the same sign
/// - Slope: the first and last loadings have opposite signs
/// - Curvature: the middle loading and the first have opposite signs
/// - any later component: a higher-order factor
pub fn interpret_components(components: &[Vec<f64>]) -> BTreeMap<String, String> {
    components
        .iter()
        .zip(FACTOR_NAMES)
        .enumerate()
        .map(|(i, (loadings, name))| (name.to_string(), label(i, loadings)))
        .collect()
}

fn label(index: usize, loadings: &[f64]) -> String {
    let (Some(&first), Some(&last)) = (loadings.first(), loadings.last()) else {
        return format!("Higher-order factor {}", index + 1);
    };

    match index {
        0 => {
            if loadings.iter().all(|&v| v > 0.0) || loadings.iter().all(|&v| v < 0.0) {
                "Parallel shift in yield curve (Level)".to_string()
            } else {
                "Mixed level movement".to_string()
            }
        }
        1 => {
            if first * last < 0.0 {
                "Yield curve steepening/flattening (Slope)".to_string()
            } else {
                "Non-standard slope movement".to_string()
            }
        }
        2 => {
            let middle = loadings[loadings.len() / 2];
            if middle * first < 0.0 {
                "Yield curve curvature change".to_string()
            } else {
                "Non-standard curvature movement".to_string()
            }
        }
        _ => format!("Higher-order factor {}", index + 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classic_shapes() {
        let components = vec![
            vec![0.5, 0.5, 0.5, 0.5],
            vec![-0.6, -0.2, 0.2, 0.6],
            vec![0.5, -0.5, -0.5, 0.5],
            vec![0.1, -0.7, 0.7, -0.1],
        ];

        let labels = interpret_components(&components);

        assert_eq!(labels["Level"], "Parallel shift in yield curve (Level)");
        assert_eq!(labels["Slope"], "Yield curve steepening/flattening (Slope)");
        assert_eq!(labels["Curvature"], "Yield curve curvature change");
        assert_eq!(labels["Butterfly"], "Higher-order factor 4");
    }

    #[test]
    fn test_non_standard_shapes() {
        let components = vec![
            vec![0.5, -0.5, 0.5],
            vec![0.3, -0.6, 0.3],
            vec![0.2, 0.9, 0.1],
        ];

        let labels = interpret_components(&components);

        assert_eq!(labels["Level"], "Mixed level movement");
        assert_eq!(labels["Slope"], "Non-standard slope movement");
        assert_eq!(labels["Curvature"], "Non-standard curvature movement");
        assert!(!labels.contains_key("Butterfly"));
    }

    #[test]
    fn test_only_four_named() {
        let components = vec![vec![1.0]; 6];
        assert_eq!(interpret_components(&components).len(), 4);
    }
}
