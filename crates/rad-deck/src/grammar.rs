//! Per-section data line grammars.
//!
//! Every function takes the already tokenized line and either builds one entity
//! or reports why the line was rejected. None of them touch parser state.

use crate::entity::{BoundaryCondition, Element, ElementType, LoadCase, Material, Node, Property};
use crate::error::LineError;

/// Token that ends the DOF part of a boundary-condition line.
pub const DOF_SEPARATOR: &str = ":";

pub fn parse_node(tokens: &[&str]) -> Result<Node, LineError> {
    require(tokens, 4)?;
    let id = parse_int(tokens[0])?;
    let x = parse_real(tokens[1])?;
    let y = parse_real(tokens[2])?;
    let z = parse_real(tokens[3])?;
    Ok(Node::new(id, x, y, z))
}

/// `id material property node_id...`
///
/// `topology` comes from the section marker. When it is `None` the topology is
/// inferred from the number of node tokens. Only an explicit
/// [`ElementType::Unknown`] section accepts a line without nodes.
pub fn parse_element(tokens: &[&str], topology: Option<ElementType>) -> Result<Element, LineError> {
    let minimum = if topology == Some(ElementType::Unknown) { 3 } else { 4 };
    require(tokens, minimum)?;
    let id = parse_int(tokens[0])?;
    let material_id = optional_reference(parse_int(tokens[1])?);
    let property_id = optional_reference(parse_int(tokens[2])?);
    let node_ids = tokens[3..]
        .iter()
        .map(|t| parse_int(t))
        .collect::<Result<Vec<_>, _>>()?;

    let element_type =
        topology.unwrap_or_else(|| ElementType::from_node_count(node_ids.len()));

    Ok(Element {
        id,
        element_type,
        node_ids,
        material_id,
        property_id,
    })
}

/// `id [law] (name value)*`, falling back to `default_law` when only the id is present.
pub fn parse_material(tokens: &[&str], default_law: Option<&str>) -> Result<Material, LineError> {
    let (id, law, properties) = parse_tagged_bag(tokens, default_law)?;
    Ok(Material {
        id,
        law,
        properties,
    })
}

/// `id [kind] (name value)*`, falling back to `default_kind` when only the id is present.
pub fn parse_property(tokens: &[&str], default_kind: Option<&str>) -> Result<Property, LineError> {
    let (id, kind, values) = parse_tagged_bag(tokens, default_kind)?;
    Ok(Property { id, kind, values })
}

/// `id type magnitude vx vy [vz] [node_id...]`
pub fn parse_load_case(tokens: &[&str]) -> Result<LoadCase, LineError> {
    require(tokens, 5)?;
    let id = parse_int(tokens[0])?;
    let kind = tokens[1].to_string();
    let magnitude = parse_real(tokens[2])?;
    let vx = parse_real(tokens[3])?;
    let vy = parse_real(tokens[4])?;
    let vz = match tokens.get(5) {
        Some(t) => parse_real(t)?,
        None => 0.0,
    };
    let node_ids = tokens
        .iter()
        .skip(6)
        .map(|t| parse_int(t))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(LoadCase {
        id,
        kind,
        magnitude,
        direction: [vx, vy, vz],
        node_ids,
    })
}

/// `id type (dof_cluster | node_id)*`
///
/// A token made only of the digits 1-6 is a packed DOF cluster (`123` constrains
/// x, y and z). Every token after a lone `:` is a node id.
pub fn parse_boundary_condition(tokens: &[&str]) -> Result<BoundaryCondition, LineError> {
    require(tokens, 3)?;
    let id = parse_int(tokens[0])?;
    let mut bc = BoundaryCondition::new(id, tokens[1]);
    let mut nodes_only = false;

    for token in &tokens[2..] {
        if *token == DOF_SEPARATOR {
            nodes_only = true;
            continue;
        }
        if !nodes_only && is_dof_cluster(token) {
            for digit in token.bytes().map(|b| b - b'0') {
                if !bc.dofs.contains(&digit) {
                    bc.dofs.push(digit);
                }
            }
            continue;
        }
        let node = token
            .parse::<i32>()
            .map_err(|_| LineError::InvalidDof(token.to_string()))?;
        bc.node_ids.push(node);
    }

    Ok(bc)
}

/// Extracts the version number from a `#RADIOSS ... version 2022` style header line.
pub fn parse_version(line: &str) -> Option<String> {
    let lower = line.to_ascii_lowercase();
    let start = lower.find("version")? + "version".len();
    let rest = line[start..].trim_start_matches(|c: char| c.is_whitespace() || c == ':');
    let version: String = rest
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    let version = version.trim_end_matches('.');
    if version.is_empty() || !version.starts_with(|c: char| c.is_ascii_digit()) {
        None
    } else {
        Some(version.to_string())
    }
}

pub fn is_dof_cluster(token: &str) -> bool {
    !token.is_empty() && token.bytes().all(|b| (b'1'..=b'6').contains(&b))
}

pub fn parse_int(token: &str) -> Result<i32, LineError> {
    token
        .parse::<i32>()
        .map_err(|_| LineError::InvalidInteger(token.to_string()))
}

/// Parses a real, accepting Fortran `D` exponents (`1.0D+03`).
pub fn parse_real(token: &str) -> Result<f64, LineError> {
    let normalized = token.replace(['D', 'd'], "E");
    match normalized.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(LineError::InvalidReal(token.to_string())),
    }
}

fn require(tokens: &[&str], expected: usize) -> Result<(), LineError> {
    if tokens.len() < expected {
        return Err(LineError::TooFewTokens {
            expected,
            found: tokens.len(),
        });
    }
    Ok(())
}

/// Material/property references of 0 mean "none".
fn optional_reference(id: i32) -> Option<i32> {
    (id != 0).then_some(id)
}

type TaggedBag = (i32, String, std::collections::BTreeMap<String, f64>);

fn parse_tagged_bag(tokens: &[&str], default_tag: Option<&str>) -> Result<TaggedBag, LineError> {
    let minimum = if default_tag.is_some() { 1 } else { 2 };
    require(tokens, minimum)?;
    let id = parse_int(tokens[0])?;
    let tag = tokens
        .get(1)
        .map(|t| t.to_string())
        .or_else(|| default_tag.map(str::to_string))
        .unwrap_or_default();

    let mut bag = std::collections::BTreeMap::new();
    // chunks_exact drops an odd trailing token
    for pair in tokens.get(2..).unwrap_or_default().chunks_exact(2) {
        bag.insert(pair[0].to_string(), parse_real(pair[1])?);
    }
    Ok((id, tag, bag))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_requires_four_numeric_tokens() {
        let node = parse_node(&["1", "0.5", "-2", "3e1"]).expect("valid node");
        assert_eq!(node.id, 1);
        assert_eq!(node.position, [0.5, -2.0, 30.0]);

        assert_eq!(
            parse_node(&["5", "1.0", "2.0"]),
            Err(LineError::TooFewTokens {
                expected: 4,
                found: 3
            })
        );
        assert_eq!(
            parse_node(&["1", "x", "0", "0"]),
            Err(LineError::InvalidReal("x".to_string()))
        );
        assert_eq!(
            parse_node(&["1.5", "0", "0", "0"]),
            Err(LineError::InvalidInteger("1.5".to_string()))
        );
    }

    #[test]
    fn reals_accept_fortran_exponent() {
        assert_eq!(parse_real("1.5D+02"), Ok(150.0));
        assert!(parse_real("nan").is_err());
        assert!(parse_real("inf").is_err());
    }

    #[test]
    fn element_topology_follows_marker_then_count() {
        let tetra = parse_element(&["7", "1", "2", "1", "2", "3", "4"], Some(ElementType::Tetra4))
            .expect("valid element");
        assert_eq!(tetra.element_type, ElementType::Tetra4);
        assert_eq!(tetra.material_id, Some(1));
        assert_eq!(tetra.property_id, Some(2));

        let quad = parse_element(&["8", "1", "2", "1", "2", "3", "4"], None).expect("valid");
        assert_eq!(quad.element_type, ElementType::Shell4);

        let hexa = parse_element(&["9", "0", "0", "1", "2", "3", "4", "5", "6", "7", "8"], None)
            .expect("valid");
        assert_eq!(hexa.element_type, ElementType::Hexa8);
        assert_eq!(hexa.material_id, None);
        assert_eq!(hexa.property_id, None);
    }

    #[test]
    fn element_without_nodes_is_rejected() {
        assert!(matches!(
            parse_element(&["1", "1", "1"], None),
            Err(LineError::TooFewTokens { expected: 4, .. })
        ));
        assert!(parse_element(&["1", "1", "1", "2", "x"], None).is_err());
    }

    #[test]
    fn unknown_section_keeps_node_count_and_allows_no_nodes() {
        let four = parse_element(&["5", "0", "0", "1", "2", "3", "4"], Some(ElementType::Unknown))
            .expect("valid");
        assert_eq!(four.element_type, ElementType::Unknown);
        assert_eq!(four.node_ids, vec![1, 2, 3, 4]);

        let bare = parse_element(&["6", "2", "0"], Some(ElementType::Unknown)).expect("valid");
        assert!(bare.node_ids.is_empty());
        assert_eq!(bare.material_id, Some(2));

        assert!(matches!(
            parse_element(&["6", "2", "0"], Some(ElementType::Tetra4)),
            Err(LineError::TooFewTokens { expected: 4, found: 3 })
        ));
    }

    #[test]
    fn material_bag_drops_odd_trailing_token() {
        let mat = parse_material(&["3", "ELASTIC", "rho", "7.8e-9", "E", "210000", "nu"], None)
            .expect("valid material");
        assert_eq!(mat.id, 3);
        assert_eq!(mat.law, "ELASTIC");
        assert_eq!(mat.get("rho"), Some(7.8e-9));
        assert_eq!(mat.get("E"), Some(210000.0));
        assert_eq!(mat.properties.len(), 2);
    }

    #[test]
    fn material_bag_rejects_non_numeric_value() {
        assert_eq!(
            parse_material(&["3", "ELASTIC", "rho", "dense"], None),
            Err(LineError::InvalidReal("dense".to_string()))
        );
    }

    #[test]
    fn bare_id_uses_marker_tag() {
        let prop = parse_property(&["4"], Some("SHELL")).expect("valid property");
        assert_eq!(prop.kind, "SHELL");
        assert!(prop.values.is_empty());
        assert!(parse_property(&["4"], None).is_err());
    }

    #[test]
    fn load_case_optional_z_and_nodes() {
        let planar = parse_load_case(&["1", "FORCE", "10", "1", "0"]).expect("valid");
        assert_eq!(planar.direction, [1.0, 0.0, 0.0]);
        assert!(planar.node_ids.is_empty());

        let full = parse_load_case(&["2", "FORCE", "5", "0", "0", "-1", "10", "11"]).expect("valid");
        assert_eq!(full.direction, [0.0, 0.0, -1.0]);
        assert_eq!(full.node_ids, vec![10, 11]);
    }

    #[test]
    fn boundary_condition_splits_dofs_and_nodes() {
        let bc = parse_boundary_condition(&["1", "FIX", "123", "100", "200"]).expect("valid");
        assert_eq!(bc.dofs, vec![1, 2, 3]);
        assert_eq!(bc.node_ids, vec![100, 200]);

        let sep = parse_boundary_condition(&["2", "FIX", "456", ":", "12", "3"]).expect("valid");
        assert_eq!(sep.dofs, vec![4, 5, 6]);
        assert_eq!(sep.node_ids, vec![12, 3]);

        assert_eq!(
            parse_boundary_condition(&["3", "FIX", "12x"]),
            Err(LineError::InvalidDof("12x".to_string()))
        );
    }

    #[test]
    fn dof_digits_outside_range_are_node_ids() {
        let bc = parse_boundary_condition(&["1", "FIX", "17", "99"]).expect("valid");
        assert!(bc.dofs.is_empty());
        assert_eq!(bc.node_ids, vec![17, 99]);
    }

    #[test]
    fn version_extraction() {
        assert_eq!(
            parse_version("#RADIOSS STARTER version 2022.1"),
            Some("2022.1".to_string())
        );
        assert_eq!(parse_version("#RADIOSS Version: 14"), Some("14".to_string()));
        assert_eq!(parse_version("#RADIOSS STARTER"), None);
    }
}
