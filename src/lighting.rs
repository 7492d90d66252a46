//! Scene light and the day/night cycle.
//!
//! The cycle moves a single point light along a half orbit above the scene
//! and back again. Each time the light reaches the far horizon, day turns
//! into night or the other way round.

use cgmath::{Point3, Vector3};
use log::debug;
use wgpu::util::DeviceExt;

use crate::animation::timed::{TickOutcome, TimedAnimation};

/// Ambient light used at night and whenever automation is switched off.
pub const DEFAULT_AMBIENT: f32 = 0.2;
pub const DAY_AMBIENT: f32 = 0.9;
const NIGHT_PEAK: f32 = 0.1;
const AMBIENT_FLOOR: f32 = 0.1;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Light {
    pub position: Point3<f32>,
    pub diffuse: Vector3<f32>,
    pub specular: Vector3<f32>,
    pub shininess: f32,
    pub ambient: Vector3<f32>,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            position: Point3::new(10.0, 10.0, 10.0),
            diffuse: Vector3::new(0.3, 0.3, 0.3),
            specular: Vector3::new(1.0, 1.0, 1.0),
            shininess: 10.0,
            ambient: Vector3::new(DEFAULT_AMBIENT, DEFAULT_AMBIENT, DEFAULT_AMBIENT),
        }
    }
}

impl Light {
    pub fn to_uniform(&self) -> LightUniform {
        LightUniform {
            position: self.position.into(),
            shininess: self.shininess,
            diffuse: self.diffuse.into(),
            _padding: 0,
            specular: self.specular.into(),
            _padding2: 0,
            ambient: self.ambient.into(),
            _padding3: 0,
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniform {
    position: [f32; 3],
    // the exponent fills the vec3's padding slot
    shininess: f32,
    diffuse: [f32; 3],
    // Uniforms require 16 byte (4 float) spacing
    _padding: u32,
    specular: [f32; 3],
    _padding2: u32,
    ambient: [f32; 3],
    _padding3: u32,
}

/// Uniform buffer and bind group carrying the light to the shaders.
pub struct LightBuffer {
    pub buffer: wgpu::Buffer,
    pub bind_group_layout: wgpu::BindGroupLayout,
    pub bind_group: wgpu::BindGroup,
    uniform: LightUniform,
}

impl LightBuffer {
    pub fn new(device: &wgpu::Device, light: &Light) -> Self {
        let uniform = light.to_uniform();
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Light Uniform Buffer"),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
            label: Some("light_bind_group_layout"),
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some("light_bind_group"),
        });
        Self {
            buffer,
            bind_group_layout,
            bind_group,
            uniform,
        }
    }

    /// Writes the light if it changed since the last write. Returns whether it did.
    pub fn write(&mut self, queue: &wgpu::Queue, light: &Light) -> bool {
        let uniform = light.to_uniform();
        if uniform == self.uniform {
            return false;
        }
        self.uniform = uniform;
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[uniform]));
        true
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sky {
    Day,
    Night,
}

/// Day/night state machine driving a [`Light`].
#[derive(Clone, Debug)]
pub struct DayNightCycle {
    orbit: TimedAnimation,
    radius: f32,
    enabled: bool,
    automate_ambient: bool,
    is_night: bool,
}

impl DayNightCycle {
    /// `half_day` is the time in seconds the light needs to cross the sky once.
    pub fn new(half_day: f32, radius: f32) -> Self {
        let mut orbit = TimedAnimation::looping(0.0, 180.0, half_day);
        orbit.start();
        Self {
            orbit,
            radius,
            enabled: true,
            automate_ambient: true,
            is_night: true,
        }
    }

    pub fn is_night(&self) -> bool {
        self.is_night
    }

    pub fn sky(&self) -> Sky {
        if self.is_night { Sky::Night } else { Sky::Day }
    }

    /// Current orbit angle in degrees.
    pub fn angle(&self) -> f32 {
        self.orbit.progress()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn automates_ambient(&self) -> bool {
        self.automate_ambient
    }

    pub fn set_automate_ambient(&mut self, automate: bool, light: &mut Light) {
        self.automate_ambient = automate;
        if !automate {
            light.ambient = Vector3::new(DEFAULT_AMBIENT, DEFAULT_AMBIENT, DEFAULT_AMBIENT);
        }
    }

    /// Switches to day when `day` is true, otherwise to night.
    pub fn change_time(&mut self, day: bool, light: &mut Light) {
        self.is_night = !day;
        let ambient = if self.is_night { DEFAULT_AMBIENT } else { DAY_AMBIENT };
        light.ambient = Vector3::new(ambient, ambient, ambient);
        debug!("sky is now {:?}", self.sky());
    }

    /// Moves the light along its orbit by `dt` seconds.
    pub fn update(&mut self, dt: f32, light: &mut Light) {
        if !self.enabled {
            return;
        }
        if self.orbit.tick(dt) == TickOutcome::Bounced && self.orbit.is_at_end() {
            let day = self.is_night;
            self.change_time(day, light);
        }

        let alpha = self.angle().to_radians();
        let (sin, cos) = alpha.sin_cos();
        light.position = Point3::new(cos * self.radius, sin * self.radius - 1.0, 0.0);

        if self.automate_ambient {
            let peak = if self.is_night { NIGHT_PEAK } else { DAY_AMBIENT };
            let s = sin * peak;
            light.ambient = Vector3::new(s.max(AMBIENT_FLOOR), s + 0.1, s + 0.1);
        }
    }
}
