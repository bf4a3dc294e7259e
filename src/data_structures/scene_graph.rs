//! Segment tree for articulated models.
//!
//! An [`ArticulatedModel`] owns one root [`Segment`]; every segment owns its
//! children. World transforms are computed by a single depth-first walk that
//! composes `parent_base · local` at each level.
//!
//! Each segment tracks two world matrices:
//! - the *base* transform sits at the joint pivot and includes the joint
//!   rotation, but none of the segment's visual sizing. Children compose against it.
//! - the *render* transform is `base · visual` and places the unit primitive.
//!   It is only used to draw this one segment.
//!
//! Keeping the two apart is what stops a child from inheriting its parent's
//! non-uniform box scale.

use std::{collections::HashMap, fmt, str::FromStr};

use cgmath::{Vector3, Zero};
use log::warn;

use crate::{
    data_structures::{
        animation::{JointMode, JointState, Pose},
        instance::SegmentInstance,
        transform::RigidTransform,
    },
    error::{RigError, RigResult},
    render::{DrawCall, TextureSelector},
};

/// Which unit primitive a segment draws.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MeshKind {
    Cube,
    Cylinder,
}

impl FromStr for MeshKind {
    type Err = RigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cube" => Ok(MeshKind::Cube),
            "cylinder" => Ok(MeshKind::Cylinder),
            _ => Err(RigError::UnknownMeshKind(s.to_string())),
        }
    }
}

impl fmt::Display for MeshKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeshKind::Cube => f.write_str("cube"),
            MeshKind::Cylinder => f.write_str("cylinder"),
        }
    }
}

/// One rigid piece of an articulated model.
#[derive(Clone, Debug)]
pub struct Segment {
    name: String,
    mesh: MeshKind,
    local_offset: RigidTransform,
    joint_axis: Vector3<f32>,
    rest_angle: f32,
    joint: JointState,
    post_joint: RigidTransform,
    visual: RigidTransform,
    color: [f32; 4],
    texture: TextureSelector,
    visible: bool,
    children: Vec<Segment>,
    world: (RigidTransform, RigidTransform),
}

impl Segment {
    /// A segment at its parent's pivot that rotates about X and draws an unscaled primitive.
    pub fn new(name: impl Into<String>, mesh: MeshKind) -> Self {
        Self {
            name: name.into(),
            mesh,
            local_offset: RigidTransform::identity(),
            joint_axis: Vector3::unit_x(),
            rest_angle: 0.0,
            joint: JointState::default(),
            post_joint: RigidTransform::identity(),
            visual: RigidTransform::identity(),
            color: [1.0, 1.0, 1.0, 1.0],
            texture: TextureSelector::SolidColor,
            visible: true,
            children: Vec::new(),
            world: (RigidTransform::identity(), RigidTransform::identity()),
        }
    }

    /// Where the joint pivot sits in the parent's base frame.
    pub fn with_offset(mut self, local_offset: RigidTransform) -> Self {
        self.local_offset = local_offset;
        self
    }

    /// Axis the joint angle rotates about, plus a fixed angle added to it.
    pub fn with_joint(mut self, axis: Vector3<f32>, rest_angle: f32) -> Self {
        self.joint_axis = axis;
        self.rest_angle = rest_angle;
        self
    }

    /// A fixed transform applied after the joint rotation; it is inherited by children.
    pub fn with_post_joint(mut self, post_joint: RigidTransform) -> Self {
        self.post_joint = post_joint;
        self
    }

    /// Placement and size of the primitive relative to the pivot. Never inherited.
    pub fn with_visual(mut self, visual: RigidTransform) -> Self {
        self.visual = visual;
        self
    }

    pub fn with_color(mut self, color: [f32; 4]) -> Self {
        self.color = color;
        self
    }

    pub fn with_texture(mut self, texture: TextureSelector) -> Self {
        self.texture = texture;
        self
    }

    pub fn with_child(mut self, child: Segment) -> Self {
        self.children.push(child);
        self
    }

    pub fn add_child(&mut self, child: Segment) {
        self.children.push(child);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mesh(&self) -> MeshKind {
        self.mesh
    }

    pub fn color(&self) -> [f32; 4] {
        self.color
    }

    pub fn texture(&self) -> TextureSelector {
        self.texture
    }

    pub fn children(&self) -> &[Segment] {
        &self.children
    }

    pub fn joint_angle(&self) -> f32 {
        self.joint.angle
    }

    pub fn set_joint_angle(&mut self, degrees: f32) {
        self.joint.angle = degrees;
    }

    pub fn joint(&self) -> JointState {
        self.joint
    }

    pub fn set_joint(&mut self, joint: JointState) {
        self.joint = joint;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Hidden segments are still posed, they are only skipped when drawing.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Pivot transform of this segment in its parent's base frame, joint included.
    pub fn local_base(&self) -> RigidTransform {
        let displacement = self.joint.displacement;
        self.local_offset
            .translate(displacement.x, displacement.y, displacement.z)
            .rotate(self.rest_angle + self.joint.angle, self.joint_axis)
            * self.post_joint
    }

    /// World base transform as of the last [`update_world_transforms`](Self::update_world_transforms).
    pub fn world_base(&self) -> RigidTransform {
        self.world.0
    }

    /// World render transform as of the last [`update_world_transforms`](Self::update_world_transforms).
    pub fn world_render(&self) -> RigidTransform {
        self.world.1
    }

    /**
     * Recomputes the cached world transforms of this segment and all descendants.
     *
     * `parent_base` is the base transform of the parent (or the model placement
     * for the root). Each child receives a copy of this segment's base, so
     * siblings never see each other's intermediate results.
     */
    pub fn update_world_transforms(&mut self, parent_base: &RigidTransform) {
        let base = parent_base * &self.local_base();
        let render = &base * &self.visual;
        self.world = (base, render);
        for child in self.children.iter_mut() {
            child.update_world_transforms(&base);
        }
    }

    pub fn find(&self, name: &str) -> Option<&Segment> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(name))
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut Segment> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter_mut().find_map(|c| c.find_mut(name))
    }

    /// Visits this segment and its descendants in depth-first pre-order.
    pub fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a Segment, usize)) {
        self.walk_at(0, visit);
    }

    fn walk_at<'a>(&'a self, depth: usize, visit: &mut dyn FnMut(&'a Segment, usize)) {
        visit(self, depth);
        for child in &self.children {
            child.walk_at(depth + 1, visit);
        }
    }

    fn count(&self) -> usize {
        1 + self.children.iter().map(Segment::count).sum::<usize>()
    }
}

/**
 * Flat, name-linked description of one segment.
 *
 * Lets a model be written as a table instead of nested constructors. The mesh
 * is given by name so a typo surfaces as [`RigError::UnknownMeshKind`] when the
 * model is built, not when it is drawn.
 */
#[derive(Clone, Debug)]
pub struct SegmentSpec {
    pub name: String,
    pub parent: Option<String>,
    pub mesh: String,
    pub local_offset: RigidTransform,
    pub joint_axis: Vector3<f32>,
    pub rest_angle: f32,
    pub post_joint: RigidTransform,
    pub visual: RigidTransform,
    pub color: [f32; 4],
}

impl SegmentSpec {
    pub fn new(name: impl Into<String>, parent: Option<&str>, mesh: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: parent.map(str::to_string),
            mesh: mesh.into(),
            local_offset: RigidTransform::identity(),
            joint_axis: Vector3::unit_x(),
            rest_angle: 0.0,
            post_joint: RigidTransform::identity(),
            visual: RigidTransform::identity(),
            color: [1.0, 1.0, 1.0, 1.0],
        }
    }

    pub fn offset(mut self, local_offset: RigidTransform) -> Self {
        self.local_offset = local_offset;
        self
    }

    pub fn joint(mut self, axis: Vector3<f32>, rest_angle: f32) -> Self {
        self.joint_axis = axis;
        self.rest_angle = rest_angle;
        self
    }

    pub fn post_joint(mut self, post_joint: RigidTransform) -> Self {
        self.post_joint = post_joint;
        self
    }

    pub fn visual(mut self, visual: RigidTransform) -> Self {
        self.visual = visual;
        self
    }

    pub fn color(mut self, color: [f32; 4]) -> Self {
        self.color = color;
        self
    }

    fn to_segment(&self) -> RigResult<Segment> {
        let mesh = self.mesh.parse::<MeshKind>()?;
        Ok(Segment::new(self.name.clone(), mesh)
            .with_offset(self.local_offset)
            .with_joint(self.joint_axis, self.rest_angle)
            .with_post_joint(self.post_joint)
            .with_visual(self.visual)
            .with_color(self.color))
    }
}

/// A fixed tree of segments plus the placement of its root in the world.
#[derive(Clone, Debug)]
pub struct ArticulatedModel {
    root: Segment,
    placement: RigidTransform,
    mode: JointMode,
}

impl ArticulatedModel {
    pub fn new(root: Segment) -> Self {
        let mut model = Self {
            root,
            placement: RigidTransform::identity(),
            mode: JointMode::Manual,
        };
        model.update_world_transforms();
        model
    }

    /**
     * Builds the tree from a flat list of specs.
     *
     * Rejects duplicate names, unknown parents, unknown mesh kinds, parent
     * cycles, and anything other than exactly one root. Children keep the
     * order in which they appear in `specs`.
     */
    pub fn from_specs(specs: &[SegmentSpec]) -> RigResult<Self> {
        let mut by_name: HashMap<&str, usize> = HashMap::with_capacity(specs.len());
        for (i, spec) in specs.iter().enumerate() {
            if by_name.insert(spec.name.as_str(), i).is_some() {
                return Err(RigError::DuplicateSegment(spec.name.clone()));
            }
        }

        let mut root = None;
        for spec in specs {
            match &spec.parent {
                Some(parent) if !by_name.contains_key(parent.as_str()) => {
                    return Err(RigError::UnknownParent {
                        segment: spec.name.clone(),
                        parent: parent.clone(),
                    });
                }
                Some(_) => (),
                None => match root {
                    None => root = Some(spec),
                    Some(first) => {
                        return Err(RigError::MultipleRoots(
                            first.name.clone(),
                            spec.name.clone(),
                        ));
                    }
                },
            }
        }

        // Every parent chain must end at the root within `specs.len()` steps.
        for spec in specs {
            let mut current = spec;
            let mut steps = 0;
            while let Some(parent) = &current.parent {
                steps += 1;
                if steps > specs.len() || parent == &spec.name {
                    return Err(RigError::CyclicParent(spec.name.clone()));
                }
                current = &specs[by_name[parent.as_str()]];
            }
        }

        let root = root.ok_or(RigError::NoRoot)?;
        let tree = Self::attach_children(root, specs)?;
        Ok(Self::new(tree))
    }

    fn attach_children(spec: &SegmentSpec, specs: &[SegmentSpec]) -> RigResult<Segment> {
        let mut segment = spec.to_segment()?;
        for child in specs
            .iter()
            .filter(|s| s.parent.as_deref() == Some(spec.name.as_str()))
        {
            segment.add_child(Self::attach_children(child, specs)?);
        }
        Ok(segment)
    }

    pub fn root(&self) -> &Segment {
        &self.root
    }

    pub fn segment(&self, name: &str) -> Option<&Segment> {
        self.root.find(name)
    }

    pub fn segment_mut(&mut self, name: &str) -> Option<&mut Segment> {
        self.root.find_mut(name)
    }

    pub fn segment_count(&self) -> usize {
        self.root.count()
    }

    pub fn mode(&self) -> JointMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: JointMode) {
        self.mode = mode;
    }

    pub fn placement(&self) -> RigidTransform {
        self.placement
    }

    /// Where the root is put in the world; applied before the root's own offset.
    pub fn set_placement(&mut self, placement: RigidTransform) {
        self.placement = placement;
    }

    /// Sets one joint angle. Returns `false` when no segment has that name.
    pub fn set_joint_angle(&mut self, name: &str, degrees: f32) -> bool {
        match self.root.find_mut(name) {
            Some(segment) => {
                segment.set_joint_angle(degrees);
                true
            }
            None => {
                warn!("No segment called `{}` to set an angle on.", name);
                false
            }
        }
    }

    /// Applies every joint in `pose`. Unknown names are skipped with a warning.
    pub fn apply_pose(&mut self, pose: &Pose) -> usize {
        let mut applied = 0;
        for (name, state) in pose.iter() {
            match self.root.find_mut(name) {
                Some(segment) => {
                    segment.set_joint(*state);
                    applied += 1;
                }
                None => warn!("Pose references unknown segment `{}`.", name),
            }
        }
        applied
    }

    /// Resets every joint to angle 0 with no displacement.
    pub fn reset_pose(&mut self) {
        fn reset(segment: &mut Segment) {
            segment.joint = JointState {
                angle: 0.0,
                displacement: Vector3::zero(),
            };
            segment.children.iter_mut().for_each(reset);
        }
        reset(&mut self.root);
    }

    pub fn update_world_transforms(&mut self) {
        let placement = self.placement;
        self.root.update_world_transforms(&placement);
    }

    /// `(name, render transform)` of every segment in depth-first order.
    pub fn get_world_transforms(&self) -> Vec<(&str, RigidTransform)> {
        let mut out = Vec::with_capacity(self.segment_count());
        self.root
            .walk(&mut |segment, _| out.push((segment.name(), segment.world_render())));
        out
    }

    /// One draw call per visible segment, in depth-first order.
    pub fn get_render(&self) -> Vec<DrawCall> {
        let mut out = Vec::with_capacity(self.segment_count());
        self.root.walk(&mut |segment, _| {
            if segment.is_visible() {
                out.push(DrawCall {
                    transform: segment.world_render(),
                    mesh: segment.mesh(),
                    color: segment.color(),
                    texture: segment.texture(),
                });
            }
        });
        out
    }

    /// Per-segment GPU instances split by mesh kind: `(cubes, cylinders)`.
    pub fn get_instances(&self) -> (Vec<SegmentInstance>, Vec<SegmentInstance>) {
        self.get_render()
            .into_iter()
            .map(|call| (call.mesh, SegmentInstance::from(&call)))
            .fold((Vec::new(), Vec::new()), |(mut cubes, mut cylinders), (mesh, inst)| {
                match mesh {
                    MeshKind::Cube => cubes.push(inst),
                    MeshKind::Cylinder => cylinders.push(inst),
                }
                (cubes, cylinders)
            })
    }
}
