//! Owning handle over one device buffer allocation.

use std::cell::RefCell;

use crate::gfx::rendering::GpuContext;
use crate::wgpu_utils::BufferData;

/// Which binding class a buffer serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferTarget {
    Vertex,
    Index,
    Uniform,
}

/// Update frequency hint. Static buffers are written once, dynamic ones every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BufferUsage {
    #[default]
    Static,
    Dynamic,
}

impl BufferTarget {
    fn usages(self) -> wgpu::BufferUsages {
        let class = match self {
            BufferTarget::Vertex => wgpu::BufferUsages::VERTEX,
            BufferTarget::Index => wgpu::BufferUsages::INDEX,
            BufferTarget::Uniform => wgpu::BufferUsages::UNIFORM,
        };
        class | wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::COPY_SRC
    }
}

/// A typed, usage-hinted block of device memory.
///
/// The handle is created without an allocation; the first [`Buffer::data`]
/// acquires one and every later `data` call replaces it. The allocation is
/// released when the handle is dropped.
///
/// A host copy of the contents is kept so partial writes can be widened to
/// the device copy alignment without clobbering neighbouring bytes.
pub struct Buffer {
    label: String,
    target: BufferTarget,
    usage: BufferUsage,
    raw: Option<wgpu::Buffer>,
    shadow: RefCell<Vec<u8>>,
    capacity: u64,
    location: Option<u32>,
}

impl std::fmt::Debug for Buffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Buffer")
            .field("label", &self.label)
            .field("target", &self.target)
            .field("usage", &self.usage)
            .field("capacity", &self.capacity)
            .field("location", &self.location)
            .field("allocated", &self.raw.is_some())
            .finish()
    }
}

impl Buffer {
    pub fn new(label: &str, target: BufferTarget, usage: BufferUsage) -> Self {
        Self {
            label: label.to_owned(),
            target,
            usage,
            raw: None,
            shadow: RefCell::new(Vec::new()),
            capacity: 0,
            location: None,
        }
    }

    /// Replaces the whole backing store with `bytes`; capacity becomes `bytes.len()`.
    pub fn data(&mut self, gpu: &GpuContext, bytes: &[u8]) {
        let capacity = bytes.len() as u64;
        // Device sizes must be a multiple of the copy alignment and non-zero.
        let size = wgpu::util::align_to(capacity.max(1), wgpu::COPY_BUFFER_ALIGNMENT);

        let raw = gpu.device().create_buffer(&wgpu::BufferDescriptor {
            label: Some(&self.label),
            size,
            usage: self.target.usages(),
            mapped_at_creation: true,
        });
        raw.slice(..).get_mapped_range_mut()[..bytes.len()].copy_from_slice(bytes);
        raw.unmap();

        let mut shadow = vec![0; size as usize];
        shadow[..bytes.len()].copy_from_slice(bytes);
        *self.shadow.get_mut() = shadow;

        if let Some(previous) = self.raw.replace(raw) {
            previous.destroy();
        }
        self.capacity = capacity;

        log::debug!(
            "buffer '{}' ({:?}, {:?}) allocated {} bytes",
            self.label,
            self.target,
            self.usage,
            capacity
        );
    }

    /// Typed form of [`Buffer::data`].
    pub fn data_of<T: bytemuck::Pod>(&mut self, gpu: &GpuContext, items: &[T]) {
        self.data(gpu, BufferData::make_data(items).bytes());
    }

    /// Overwrites `bytes.len()` bytes starting at `offset`.
    ///
    /// Any offset and length within capacity is accepted; the upload covers
    /// the enclosing 4-byte aligned window.
    ///
    /// # Panics
    /// If the range does not fit within the capacity set by the last `data` call.
    pub fn sub_data(&self, gpu: &GpuContext, bytes: &[u8], offset: u64) {
        self.check_range(offset, bytes.len() as u64);
        let Some(raw) = &self.raw else { return };
        if bytes.is_empty() {
            return;
        }

        let mut shadow = self.shadow.borrow_mut();
        let start = offset as usize;
        shadow[start..start + bytes.len()].copy_from_slice(bytes);

        let (from, to) = aligned_window(offset, bytes.len() as u64);
        gpu.queue()
            .write_buffer(raw, from, &shadow[from as usize..to as usize]);
    }

    pub fn sub_data_of<T: bytemuck::Pod>(&self, gpu: &GpuContext, value: &T, offset: u64) {
        self.sub_data(gpu, BufferData::make_data_of(value).bytes(), offset);
    }

    fn check_range(&self, offset: u64, len: u64) {
        assert!(
            offset.checked_add(len).is_some_and(|end| end <= self.capacity),
            "sub_data on buffer '{}' writes {len} bytes at offset {offset} but capacity is {}",
            self.label,
            self.capacity
        );
    }

    /// Associates the buffer with binding slot `index` of the uniform group.
    pub fn bind_at_location(&mut self, index: u32) -> &mut Self {
        self.location = Some(index);
        self
    }

    pub fn location(&self) -> Option<u32> {
        self.location
    }

    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    pub fn target(&self) -> BufferTarget {
        self.target
    }

    pub fn usage(&self) -> BufferUsage {
        self.usage
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// The device allocation, once `data` has been called.
    pub fn raw(&self) -> Option<&wgpu::Buffer> {
        self.raw.as_ref()
    }

    /// Releases the device allocation now rather than at drop.
    pub fn destroy(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(raw) = self.raw.take() {
            raw.destroy();
            log::trace!("buffer '{}' released", self.label);
        }
        self.shadow.get_mut().clear();
        self.capacity = 0;
    }
}

/// Smallest copy-aligned `[from, to)` covering `len` bytes at `offset`.
fn aligned_window(offset: u64, len: u64) -> (u64, u64) {
    let from = offset - offset % wgpu::COPY_BUFFER_ALIGNMENT;
    let to = wgpu::util::align_to(offset + len, wgpu::COPY_BUFFER_ALIGNMENT);
    (from, to)
}

impl Drop for Buffer {
    fn drop(&mut self) {
        self.release();
    }
}
