//! Scene graph and hierarchical scene organization.
//!
//! The scene is a tree of [`SceneNode`]s rooted in [`Scene`]. Each node has a
//! local [`Transform`] and a [`NodeKind`]: a plain group, a mesh (geometry plus
//! material) or a light. Nodes are added while the scene is assembled and are
//! never removed afterwards; node names are used to address them, e.g. by the
//! debug panel bindings.

use crate::data_structures::{
    geometry::Geometry,
    light::{Light, LightKind},
    material::StandardMaterial,
    transform::Transform,
};

/// Geometry and material of a drawable node.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshNode {
    pub geometry: Geometry,
    pub material: StandardMaterial,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    Group,
    Mesh(MeshNode),
    Light(Light),
}

#[derive(Clone, Debug, PartialEq)]
pub struct SceneNode {
    pub name: String,
    pub transform: Transform,
    pub kind: NodeKind,
    pub children: Vec<SceneNode>,
}

impl SceneNode {
    fn new(name: &str, kind: NodeKind) -> Self {
        Self {
            name: name.to_string(),
            transform: Transform::default(),
            kind,
            children: Vec::new(),
        }
    }

    pub fn group(name: &str) -> Self {
        Self::new(name, NodeKind::Group)
    }

    pub fn mesh(name: &str, geometry: Geometry, material: StandardMaterial) -> Self {
        Self::new(
            name,
            NodeKind::Mesh(MeshNode {
                geometry,
                material,
                cast_shadow: false,
                receive_shadow: false,
            }),
        )
    }

    pub fn light(name: &str, light: Light) -> Self {
        Self::new(name, NodeKind::Light(light))
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_position(mut self, x: f32, y: f32, z: f32) -> Self {
        self.transform.position = cgmath::Vector3::new(x, y, z);
        self
    }

    pub fn receiving_shadow(mut self) -> Self {
        if let NodeKind::Mesh(mesh) = &mut self.kind {
            mesh.receive_shadow = true;
        }
        self
    }

    pub fn add_child(&mut self, child: SceneNode) {
        self.children.push(child);
    }

    pub fn as_mesh(&self) -> Option<&MeshNode> {
        match &self.kind {
            NodeKind::Mesh(mesh) => Some(mesh),
            _ => None,
        }
    }

    pub fn as_light(&self) -> Option<&Light> {
        match &self.kind {
            NodeKind::Light(light) => Some(light),
            _ => None,
        }
    }

    pub fn as_light_mut(&mut self) -> Option<&mut Light> {
        match &mut self.kind {
            NodeKind::Light(light) => Some(light),
            _ => None,
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self.kind, NodeKind::Group)
    }

    fn find(&self, name: &str) -> Option<&SceneNode> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(name))
    }

    fn find_mut(&mut self, name: &str) -> Option<&mut SceneNode> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter_mut().find_map(|child| child.find_mut(name))
    }

    fn visit<'a>(&'a self, parent: &Transform, f: &mut dyn FnMut(&'a SceneNode, &Transform)) {
        let world = parent * &self.transform;
        f(self, &world);
        for child in &self.children {
            child.visit(&world, f);
        }
    }
}

/// A node resolved together with its world transform.
pub struct Placed<'a, T> {
    pub node: &'a SceneNode,
    pub item: &'a T,
    pub world: Transform,
}

/// Root of the scene graph.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    root: SceneNode,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            root: SceneNode::group("scene"),
        }
    }

    pub fn add(&mut self, node: SceneNode) {
        self.root.add_child(node);
    }

    pub fn find(&self, name: &str) -> Option<&SceneNode> {
        self.root.find(name)
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut SceneNode> {
        self.root.find_mut(name)
    }

    /// Depth-first walk over every node with its world transform.
    pub fn walk<'a>(&'a self, f: &mut dyn FnMut(&'a SceneNode, &Transform)) {
        self.root.visit(&Transform::default(), f);
    }

    pub fn meshes(&self) -> Vec<Placed<'_, MeshNode>> {
        let mut meshes = Vec::new();
        self.walk(&mut |node, world| {
            if let NodeKind::Mesh(mesh) = &node.kind {
                meshes.push(Placed {
                    node,
                    item: mesh,
                    world: world.clone(),
                });
            }
        });
        meshes
    }

    pub fn lights(&self) -> Vec<Placed<'_, Light>> {
        let mut lights = Vec::new();
        self.walk(&mut |node, world| {
            if let NodeKind::Light(light) = &node.kind {
                lights.push(Placed {
                    node,
                    item: light,
                    world: world.clone(),
                });
            }
        });
        lights
    }

    /// Lights of one kind, compared by variant only.
    pub fn lights_of(&self, kind: fn(&LightKind) -> bool) -> Vec<Placed<'_, Light>> {
        self.lights()
            .into_iter()
            .filter(|placed| kind(&placed.item.kind))
            .collect()
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
