//! The indexed model store.
//!
//! [`Model`] is the single owner of every entity. Entities refer to each other
//! by id and all lookups resolve through the per-collection id index, so
//! removing or re-inserting an entity can never leave a dangling reference
//! behind, only an unresolved id that [`Model::validate`] reports.

use rad_deck::{
    BoundaryCondition, Element, ElementType, LoadCase, Material, Node, Property, RecordSink, Vec3,
};

use crate::collection::Collection;
use crate::geometry::{self, Aabb, DEGENERATE_THRESHOLD};
use crate::mesh::{MeshBuilder, TriangleMesh};
use crate::transform::{self, AxisConvention};

#[derive(Debug, Clone, Default)]
pub struct Model {
    title: String,
    version: Option<String>,
    nodes: Collection<Node>,
    elements: Collection<Element>,
    materials: Collection<Material>,
    properties: Collection<Property>,
    load_cases: Collection<LoadCase>,
    boundary_conditions: Collection<BoundaryCondition>,
    bounds: Aabb,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn set_version(&mut self, version: Option<String>) {
        self.version = version;
    }

    // ---- insertion ----

    pub fn add_node(&mut self, node: Node) {
        self.nodes.push(node);
    }

    pub fn add_element(&mut self, element: Element) {
        self.elements.push(element);
    }

    pub fn add_material(&mut self, material: Material) {
        self.materials.push(material);
    }

    pub fn add_property(&mut self, property: Property) {
        self.properties.push(property);
    }

    pub fn add_load_case(&mut self, load_case: LoadCase) {
        self.load_cases.push(load_case);
    }

    pub fn add_boundary_condition(&mut self, condition: BoundaryCondition) {
        self.boundary_conditions.push(condition);
    }

    // ---- lookup ----

    pub fn find_node(&self, id: i32) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn find_node_mut(&mut self, id: i32) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    pub fn find_element(&self, id: i32) -> Option<&Element> {
        self.elements.get(id)
    }

    pub fn find_material(&self, id: i32) -> Option<&Material> {
        self.materials.get(id)
    }

    pub fn find_property(&self, id: i32) -> Option<&Property> {
        self.properties.get(id)
    }

    pub fn find_load_case(&self, id: i32) -> Option<&LoadCase> {
        self.load_cases.get(id)
    }

    pub fn find_boundary_condition(&self, id: i32) -> Option<&BoundaryCondition> {
        self.boundary_conditions.get(id)
    }

    // ---- removal (O(n): shifts later index entries) ----

    /// Removes a node and refreshes the bounds. Elements that referenced it
    /// keep the id; [`Model::validate`] reports them.
    pub fn remove_node(&mut self, id: i32) -> Option<Node> {
        let removed = self.nodes.remove(id)?;
        self.calculate_bounds();
        Some(removed)
    }

    pub fn remove_element(&mut self, id: i32) -> Option<Element> {
        self.elements.remove(id)
    }

    pub fn remove_material(&mut self, id: i32) -> Option<Material> {
        self.materials.remove(id)
    }

    pub fn remove_property(&mut self, id: i32) -> Option<Property> {
        self.properties.remove(id)
    }

    // ---- collections ----

    pub fn nodes(&self) -> &[Node] {
        self.nodes.as_slice()
    }

    pub fn elements(&self) -> &[Element] {
        self.elements.as_slice()
    }

    pub fn materials(&self) -> &[Material] {
        self.materials.as_slice()
    }

    pub fn properties(&self) -> &[Property] {
        self.properties.as_slice()
    }

    pub fn load_cases(&self) -> &[LoadCase] {
        self.load_cases.as_slice()
    }

    pub fn boundary_conditions(&self) -> &[BoundaryCondition] {
        self.boundary_conditions.as_slice()
    }

    pub(crate) fn node_collection(&self) -> &Collection<Node> {
        &self.nodes
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    pub fn property_count(&self) -> usize {
        self.properties.len()
    }

    pub fn load_case_count(&self) -> usize {
        self.load_cases.len()
    }

    pub fn boundary_condition_count(&self) -> usize {
        self.boundary_conditions.len()
    }

    pub fn elements_of_type(&self, element_type: ElementType) -> impl Iterator<Item = &Element> {
        self.elements
            .iter()
            .filter(move |e| e.element_type == element_type)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
            && self.elements.is_empty()
            && self.materials.is_empty()
            && self.properties.is_empty()
            && self.load_cases.is_empty()
            && self.boundary_conditions.is_empty()
    }

    // ---- lifecycle ----

    /// Rebuilds every id index from storage; the last occurrence of an id wins.
    pub fn rebuild_indexes(&mut self) {
        self.nodes.rebuild();
        self.elements.rebuild();
        self.materials.rebuild();
        self.properties.rebuild();
        self.load_cases.rebuild();
        self.boundary_conditions.rebuild();
    }

    /// Post-load pass: indexes, per-node fixed flags, and bounds.
    pub fn finalize(&mut self) {
        self.rebuild_indexes();
        self.apply_fixed_flags();
        self.calculate_bounds();
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Sets each node's per-axis fixed flags from the translational DOFs (1-3)
    /// of the boundary conditions that reference it.
    pub fn apply_fixed_flags(&mut self) {
        for node in self.nodes.iter_mut() {
            node.fixed = [false; 3];
        }
        for condition in self.boundary_conditions.iter() {
            for &node_id in &condition.node_ids {
                if let Some(node) = self.nodes.get_mut(node_id) {
                    for &dof in &condition.dofs {
                        if (1..=3).contains(&dof) {
                            node.fixed[usize::from(dof - 1)] = true;
                        }
                    }
                }
            }
        }
    }

    // ---- derived geometry ----

    /// Recomputes and stores the axis-aligned bounds of all nodes.
    pub fn calculate_bounds(&mut self) -> Aabb {
        self.bounds = Aabb::from_points(self.nodes.iter().map(|n| &n.position));
        self.bounds
    }

    /// Cached bounds. [`Model::finalize`], [`Model::remove_node`] and the
    /// transforms refresh them; after `add_node` or edits through
    /// [`Model::find_node_mut`] call [`Model::calculate_bounds`] before reading
    /// this, [`Model::center`] or [`Model::bounding_radius`].
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    pub fn center(&self) -> Vec3 {
        self.bounds.center()
    }

    /// Largest distance from [`Model::center`] to any node.
    pub fn bounding_radius(&self) -> f64 {
        let center = self.center();
        self.nodes
            .iter()
            .map(|n| geometry::distance(n.position, center))
            .fold(0.0, f64::max)
    }

    /// Positions of an element's nodes, `None` if any id does not resolve.
    pub fn element_positions(&self, element: &Element) -> Option<Vec<Vec3>> {
        element
            .node_ids
            .iter()
            .map(|id| self.find_node(*id).map(|n| n.position))
            .collect()
    }

    /// Shape quality in [0, 1] from the element's first three nodes.
    ///
    /// Elements with fewer than three nodes or an unresolved node score 0.
    pub fn quality(&self, element: &Element) -> f64 {
        match self.element_positions(element).as_deref() {
            Some([a, b, c, ..]) => geometry::triangle_quality(*a, *b, *c),
            _ => 0.0,
        }
    }

    pub fn is_degenerate(&self, element: &Element) -> bool {
        self.quality(element) < DEGENERATE_THRESHOLD
    }

    pub fn degenerate_elements(&self) -> impl Iterator<Item = &Element> {
        self.elements
            .iter()
            .filter(|e| e.node_ids.len() >= 3 && self.is_degenerate(e))
    }

    /// Triangulated surface and wireframe for rendering.
    ///
    /// Elements with an unresolved node are skipped.
    pub fn triangulate(&self) -> TriangleMesh {
        let positions = self.nodes.iter().map(|n| n.position).collect();
        let mut builder = MeshBuilder::new(positions);
        for element in self.elements.iter() {
            let vertices: Option<Vec<u32>> = element
                .node_ids
                .iter()
                .map(|id| self.nodes.position(*id).and_then(|p| u32::try_from(p).ok()))
                .collect();
            if let Some(vertices) = vertices {
                builder.add_element(element.element_type, &vertices);
            }
        }
        builder.finish()
    }

    // ---- transforms ----

    /// Multiplies every node position by `factor` and refreshes the bounds.
    pub fn scale(&mut self, factor: f64) {
        for node in self.nodes.iter_mut() {
            node.position = node.position.map(|c| c * factor);
        }
        self.calculate_bounds();
    }

    pub fn convert_axes(&mut self, from: AxisConvention, to: AxisConvention) {
        for node in self.nodes.iter_mut() {
            node.position = transform::convert_axes(node.position, from, to);
        }
        self.calculate_bounds();
    }
}

impl RecordSink for Model {
    fn node(&mut self, node: Node) {
        self.add_node(node);
    }

    fn element(&mut self, element: Element) {
        self.add_element(element);
    }

    fn material(&mut self, material: Material) {
        self.add_material(material);
    }

    fn property(&mut self, property: Property) {
        self.add_property(property);
    }

    fn load_case(&mut self, load_case: LoadCase) {
        self.add_load_case(load_case);
    }

    fn boundary_condition(&mut self, condition: BoundaryCondition) {
        self.add_boundary_condition(condition);
    }

    fn title(&mut self, title: &str) {
        self.set_title(title);
    }

    fn version(&mut self, version: &str) {
        self.set_version(Some(version.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::{LengthUnit, length_scale};

    fn unit_square() -> Model {
        let mut model = Model::new();
        model.add_node(Node::new(1, 0.0, 0.0, 0.0));
        model.add_node(Node::new(2, 1.0, 0.0, 0.0));
        model.add_node(Node::new(3, 1.0, 1.0, 0.0));
        model.add_node(Node::new(4, 0.0, 1.0, 0.0));
        model.add_element(Element::new(10, ElementType::Shell4, vec![1, 2, 3, 4]));
        model.calculate_bounds();
        model
    }

    #[test]
    fn lookup_by_id() {
        let model = unit_square();
        assert_eq!(model.find_node(3).map(|n| n.position), Some([1.0, 1.0, 0.0]));
        assert!(model.find_node(99).is_none());
        assert_eq!(model.find_element(10).map(|e| e.node_ids.len()), Some(4));
    }

    #[test]
    fn removal_keeps_index_consistent() {
        let mut model = unit_square();
        assert_eq!(model.remove_node(2).map(|n| n.id), Some(2));
        assert_eq!(model.node_count(), 3);
        for id in [1, 3, 4] {
            assert_eq!(model.find_node(id).map(|n| n.id), Some(id));
        }
        assert!(model.find_node(2).is_none());
        assert!(model.remove_node(2).is_none());

        assert!(model.remove_element(10).is_some());
        assert!(model.find_element(10).is_none());
        assert_eq!(model.element_count(), 0);
    }

    #[test]
    fn removing_extreme_node_shrinks_bounds() {
        let mut model = unit_square();
        model.add_node(Node::new(5, 4.0, -2.0, 3.0));
        model.calculate_bounds();
        assert_eq!(model.bounds().max, [4.0, 1.0, 3.0]);

        model.remove_node(5);
        assert_eq!(model.bounds().min, [0.0, 0.0, 0.0]);
        assert_eq!(model.bounds().max, [1.0, 1.0, 0.0]);
        assert_eq!(model.center(), [0.5, 0.5, 0.0]);
        assert!((model.bounding_radius() - 0.5f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn bounds_are_idempotent() {
        let mut model = unit_square();
        let first = model.calculate_bounds();
        let second = model.calculate_bounds();
        assert_eq!(first, second);
        assert_eq!(first.min, [0.0, 0.0, 0.0]);
        assert_eq!(first.max, [1.0, 1.0, 0.0]);
        assert_eq!(model.center(), [0.5, 0.5, 0.0]);
        assert!((model.bounding_radius() - 0.5f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn empty_model_bounds_default_to_origin() {
        let mut model = Model::new();
        let bounds = model.calculate_bounds();
        assert_eq!(bounds, Aabb::default());
        assert_eq!(model.bounding_radius(), 0.0);
    }

    #[test]
    fn quality_of_square_and_unresolved_element() {
        let mut model = unit_square();
        let square = model.find_element(10).cloned().expect("element");
        let q = model.quality(&square);
        assert!(q > 0.0 && q < 1.0);
        assert!(!model.is_degenerate(&square));

        model.add_element(Element::new(11, ElementType::Shell3, vec![1, 2, 42]));
        let dangling = model.find_element(11).cloned().expect("element");
        assert_eq!(model.quality(&dangling), 0.0);
        assert!(model.is_degenerate(&dangling));
    }

    #[test]
    fn collinear_triangle_is_degenerate() {
        let mut model = Model::new();
        model.add_node(Node::new(1, 0.0, 0.0, 0.0));
        model.add_node(Node::new(2, 1.0, 0.0, 0.0));
        model.add_node(Node::new(3, 2.0, 0.0, 0.0));
        model.add_element(Element::new(1, ElementType::Shell3, vec![1, 2, 3]));
        assert_eq!(model.degenerate_elements().count(), 1);
    }

    #[test]
    fn triangulation_uses_storage_positions() {
        let model = unit_square();
        let mesh = model.triangulate();
        assert_eq!(mesh.positions.len(), 4);
        assert_eq!(mesh.triangles, vec![[0, 1, 2], [0, 2, 3]]);
        assert_eq!(mesh.edges.len(), 4);
    }

    #[test]
    fn triangulation_skips_unresolved_elements() {
        let mut model = unit_square();
        model.add_element(Element::new(11, ElementType::Shell3, vec![1, 2, 42]));
        assert_eq!(model.triangulate().triangle_count(), 2);
    }

    #[test]
    fn fixed_flags_follow_translational_dofs() {
        let mut model = unit_square();
        model.add_boundary_condition(
            BoundaryCondition::new(1, "FIX").with_dofs([1, 3, 5]).on_nodes([1, 4]),
        );
        model.finalize();
        assert_eq!(model.find_node(1).map(|n| n.fixed), Some([true, false, true]));
        assert_eq!(model.find_node(2).map(|n| n.fixed), Some([false; 3]));
    }

    #[test]
    fn scaling_updates_bounds() {
        let mut model = unit_square();
        model.scale(length_scale(LengthUnit::Meter, LengthUnit::Millimeter));
        assert!((model.bounds().max[0] - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn axis_conversion_updates_bounds() {
        let mut model = unit_square();
        model.convert_axes(AxisConvention::YUp, AxisConvention::ZUp);
        assert_eq!(model.bounds().max, [1.0, 0.0, 1.0]);
    }

    #[test]
    fn clear_returns_to_empty() {
        let mut model = unit_square();
        model.set_title("square");
        model.clear();
        assert!(model.is_empty());
        assert!(model.title().is_empty());
        assert!(model.find_node(1).is_none());
        assert_eq!(model.bounds(), Aabb::default());
    }
}
