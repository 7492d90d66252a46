//! Per-part instance data for GPU rendering.
//!
//! Every [`Draw`] a rig produces is packed into a [`PartRaw`]: its model
//! matrix, the matrix that transforms its normals, and its colour. Draws of
//! the same shape share one instance buffer and one instanced draw call.

use std::collections::{HashMap, HashSet};

use cgmath::{Matrix, Matrix3, Matrix4, SquareMatrix};
use log::warn;

use crate::render::{Draw, Shape, UploadCache};

/**
 * The raw instance is the actual data stored on the GPU
 */
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PartRaw {
    pub model: [[f32; 4]; 4],
    pub normal: [[f32; 3]; 3],
    pub color: [f32; 4],
}

/// Inverse transpose of the upper 3x3 of `model`.
///
/// Falls back to the identity for singular matrices (a part scaled to zero
/// has no meaningful normals).
pub fn normal_matrix(model: &Matrix4<f32>) -> Matrix3<f32> {
    let linear = Matrix3::from_cols(model.x.truncate(), model.y.truncate(), model.z.truncate());
    match linear.invert() {
        Some(inverse) => inverse.transpose(),
        None => {
            warn!("singular model matrix, using identity normal matrix");
            Matrix3::identity()
        }
    }
}

impl PartRaw {
    pub fn from_draw(draw: &Draw) -> Self {
        Self {
            model: draw.matrix.into(),
            normal: normal_matrix(&draw.matrix).into(),
            color: draw.color,
        }
    }

    /**
     * As we store instance data directly in the GPU memory we need to tell what the bytes refer to:
     *
     * Stride layout here: model matrix as four vec4s, normal matrix as three vec3s, then the colour.
     */
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        const ATTRIBUTES: [wgpu::VertexAttribute; 8] = wgpu::vertex_attr_array![
            5 => Float32x4,
            6 => Float32x4,
            7 => Float32x4,
            8 => Float32x4,
            9 => Float32x3,
            10 => Float32x3,
            11 => Float32x3,
            12 => Float32x4,
        ];
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<PartRaw>() as wgpu::BufferAddress,
            // Shaders only advance to the next instance when a new instance starts
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &ATTRIBUTES,
        }
    }
}

/// Packs draws per shape, keeping the order in which shapes first appear.
pub fn group_by_shape(draws: &[Draw]) -> Vec<(Shape, Vec<PartRaw>)> {
    let mut groups: Vec<(Shape, Vec<PartRaw>)> = Vec::new();
    for draw in draws {
        let raw = PartRaw::from_draw(draw);
        match groups.iter_mut().find(|(shape, _)| *shape == draw.shape) {
            Some((_, raws)) => raws.push(raw),
            None => groups.push((draw.shape, vec![raw])),
        }
    }
    groups
}

/// One growable instance buffer.
#[derive(Debug)]
pub struct InstanceBuffer {
    pub buffer: wgpu::Buffer,
    capacity: usize,
    len: usize,
}

impl InstanceBuffer {
    pub fn new(device: &wgpu::Device, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            buffer: device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("Part Instance Buffer"),
                size: (capacity * std::mem::size_of::<PartRaw>()) as wgpu::BufferAddress,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }),
            capacity,
            len: 0,
        }
    }

    /// Number of instances written last.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn write(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, raws: &[PartRaw]) {
        if raws.len() > self.capacity {
            *self = Self::new(device, raws.len().next_power_of_two());
        }
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(raws));
        self.len = raws.len();
    }
}

/// What one frame's upload has to do.
#[derive(Debug, Default, PartialEq)]
pub struct BatchPlan {
    /// Groups whose content changed.
    pub writes: Vec<(Shape, Vec<PartRaw>)>,
    /// Shapes drawn last frame but not this one.
    pub emptied: Vec<Shape>,
}

/// Decides per frame which shapes need a write and which went empty.
#[derive(Debug, Default)]
pub struct BatchPlanner {
    cache: UploadCache<Shape, PartRaw>,
    live: HashSet<Shape>,
}

impl BatchPlanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plan(&mut self, draws: &[Draw]) -> BatchPlan {
        let groups = group_by_shape(draws);
        let present: HashSet<Shape> = groups.iter().map(|(shape, _)| *shape).collect();
        let emptied: Vec<Shape> = self.live.difference(&present).copied().collect();
        // an emptied shape must be written again when it comes back
        for shape in &emptied {
            self.cache.invalidate(shape);
        }
        self.live = present;
        let writes = groups
            .into_iter()
            .filter(|(shape, raws)| self.cache.needs_upload(*shape, raws))
            .collect();
        BatchPlan { writes, emptied }
    }

    /// Uploads skipped because the data was unchanged.
    pub fn skipped(&self) -> usize {
        self.cache.skipped()
    }
}

/// Instance buffers for every shape in use, written only when their content changed.
#[derive(Debug, Default)]
pub struct InstanceBatches {
    buffers: HashMap<Shape, InstanceBuffer>,
    planner: BatchPlanner,
}

impl InstanceBatches {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uploads `draws` grouped by shape and returns how many groups were written.
    /// Shapes without draws this frame are left with zero instances.
    pub fn upload(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, draws: &[Draw]) -> usize {
        let plan = self.planner.plan(draws);
        for shape in &plan.emptied {
            if let Some(buffer) = self.buffers.get_mut(shape) {
                buffer.len = 0;
            }
        }
        let written = plan.writes.len();
        for (shape, raws) in plan.writes {
            self.buffers
                .entry(shape)
                .or_insert_with(|| InstanceBuffer::new(device, raws.len()))
                .write(device, queue, &raws);
        }
        written
    }

    pub fn get(&self, shape: Shape) -> Option<&InstanceBuffer> {
        self.buffers.get(&shape)
    }

    /// Uploads skipped because the data was unchanged.
    pub fn skipped(&self) -> usize {
        self.planner.skipped()
    }
}
