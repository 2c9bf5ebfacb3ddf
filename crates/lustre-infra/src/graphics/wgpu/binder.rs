// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Turns binding tables into `wgpu` bind groups.
//!
//! Two binding models are supported. In the discrete model every table field
//! is its own bind group entry. In the argument-buffer model a whole
//! [`BindingTableArray`] lives in one storage buffer and draws pick their
//! record by index.

use std::collections::HashMap;
use std::marker::PhantomData;
use std::ops::Range;

use wgpu::util::DeviceExt;

use lustre_core::binding::{BindingModel, BindingTable, BindingTableArray, TextureRole};
use lustre_core::{
    BindingError, BindingTableLayout, LayoutError, MaterialBindingConfig, TextureHandle,
};

use super::conversions::IntoWgpu;

/// A `wgpu::BindGroupLayout` created from a binding table layout.
#[derive(Debug)]
pub struct MaterialBindGroupLayout {
    layout: wgpu::BindGroupLayout,
    table_layout: BindingTableLayout,
    model: BindingModel,
    label: Option<String>,
}

impl MaterialBindGroupLayout {
    /// Creates the layout object for `table_layout` under `config`.
    pub fn new(
        device: &wgpu::Device,
        table_layout: &BindingTableLayout,
        config: &MaterialBindingConfig,
    ) -> Self {
        let entries: Vec<wgpu::BindGroupLayoutEntry> = table_layout
            .bind_group_layout_entries(config.binding_model, config.visibility())
            .into_iter()
            .map(IntoWgpu::into_wgpu)
            .collect();
        let label = config
            .label
            .clone()
            .or_else(|| table_layout.label().map(str::to_owned));

        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: label.as_deref(),
            entries: &entries,
        });
        log::debug!(
            "Created {:?} bind group layout '{}' with {} entries",
            config.binding_model,
            label.as_deref().unwrap_or("unnamed"),
            entries.len()
        );

        Self {
            layout,
            table_layout: table_layout.clone(),
            model: config.binding_model,
            label,
        }
    }

    /// Creates the layout object for table type `T`, with its first field at
    /// `config.base_slot`.
    pub fn for_table<T: BindingTable>(
        device: &wgpu::Device,
        config: &MaterialBindingConfig,
    ) -> Result<Self, LayoutError> {
        let table_layout = T::layout(config.base_slot)?;
        Ok(Self::new(device, &table_layout, config))
    }

    /// The underlying `wgpu` object, for pipeline layout creation.
    pub fn raw(&self) -> &wgpu::BindGroupLayout {
        &self.layout
    }

    /// The table layout the object was created from.
    pub fn table_layout(&self) -> &BindingTableLayout {
        &self.table_layout
    }

    /// The binding model of the layout.
    pub fn model(&self) -> BindingModel {
        self.model
    }

    fn expect_model(&self, expected: BindingModel) -> Result<(), BindingError> {
        if self.model == expected {
            Ok(())
        } else {
            Err(BindingError::WrongBindingModel {
                expected,
                found: self.model,
            })
        }
    }
}

/// Resolves texture handles to views. Implemented by whatever owns the
/// textures; binding tables only carry the handles.
pub trait TextureViewSource {
    /// The view for `handle`, if it is known.
    fn texture_view(&self, handle: TextureHandle) -> Option<&wgpu::TextureView>;
}

/// A simple owning pool of texture views keyed by handle.
#[derive(Debug, Default)]
pub struct TextureViewPool {
    views: HashMap<TextureHandle, wgpu::TextureView>,
    next_handle: u32,
}

impl TextureViewPool {
    /// Creates an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a view and returns the handle that now refers to it.
    pub fn insert(&mut self, view: wgpu::TextureView) -> TextureHandle {
        let handle = TextureHandle::new(self.next_handle);
        self.next_handle += 1;
        self.views.insert(handle, view);
        handle
    }

    /// Removes a view. Tables still holding its handle fail to bind afterwards.
    pub fn remove(&mut self, handle: TextureHandle) -> Option<wgpu::TextureView> {
        self.views.remove(&handle)
    }

    /// Number of views in the pool.
    pub fn len(&self) -> usize {
        self.views.len()
    }

    /// Whether the pool holds no views.
    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}

impl TextureViewSource for TextureViewPool {
    fn texture_view(&self, handle: TextureHandle) -> Option<&wgpu::TextureView> {
        self.views.get(&handle)
    }
}

/// A discrete-model bind group for tables of type `T` and the uniform buffer
/// holding their constants record.
#[derive(Debug)]
pub struct MaterialBindGroup<T: BindingTable> {
    bind_group: wgpu::BindGroup,
    constants: wgpu::Buffer,
    table: PhantomData<fn() -> T>,
}

impl<T: BindingTable> MaterialBindGroup<T> {
    /// The bind group to set before drawing.
    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }

    /// The uniform buffer bound at the constants slot.
    pub fn constants_buffer(&self) -> &wgpu::Buffer {
        &self.constants
    }

    /// Overwrites the constants record between frames.
    pub fn update_constants(&self, queue: &wgpu::Queue, constants: &T::Constants) {
        queue.write_buffer(&self.constants, 0, bytemuck::bytes_of(constants));
    }
}

/// Binds every field of `table` for the discrete model: each texture role at
/// its slot and the constants record in a uniform buffer at the derived slot.
pub fn create_material_bind_group<T: BindingTable>(
    device: &wgpu::Device,
    layout: &MaterialBindGroupLayout,
    table: &T,
    views: &impl TextureViewSource,
) -> Result<MaterialBindGroup<T>, BindingError> {
    layout.expect_model(BindingModel::Discrete)?;
    let table_layout = layout.table_layout();

    let mut entries = Vec::with_capacity(<T::Role as TextureRole>::ALL.len() + 1);
    for role in <T::Role as TextureRole>::ALL {
        let handle = table.texture(*role);
        let view = views
            .texture_view(handle)
            .ok_or_else(|| BindingError::UnknownTexture {
                field: role.field_name().to_string(),
                handle,
            })?;
        entries.push(wgpu::BindGroupEntry {
            binding: table_layout.field(role.field_name())?.slot.index(),
            resource: wgpu::BindingResource::TextureView(view),
        });
    }

    let constants = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: layout.label.as_deref(),
        contents: bytemuck::bytes_of(table.constants()),
        usage: wgpu::BufferUsages::UNIFORM
            | wgpu::BufferUsages::COPY_DST
            | wgpu::BufferUsages::COPY_SRC,
    });
    entries.push(wgpu::BindGroupEntry {
        binding: table_layout.field(T::CONSTANTS_FIELD)?.slot.index(),
        resource: constants.as_entire_binding(),
    });

    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: layout.label.as_deref(),
        layout: layout.raw(),
        entries: &entries,
    });
    log::debug!(
        "Created bind group for {} with {} entries",
        T::NAME,
        entries.len()
    );

    Ok(MaterialBindGroup {
        bind_group,
        constants,
        table: PhantomData,
    })
}

/// A storage buffer of binding tables for the argument-buffer model.
///
/// Handles inside the records are indices the shader resolves itself; making
/// the referenced textures available is up to the caller, using
/// [`BindingTableArray::referenced_textures`].
#[derive(Debug)]
pub struct ArgumentBuffer {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    capacity: usize,
    stride: usize,
}

impl ArgumentBuffer {
    /// Allocates room for `capacity` tables of type `T`.
    ///
    /// Fails with [`BindingError::ZeroCapacity`] when `capacity` is zero.
    pub fn new<T: BindingTable>(
        device: &wgpu::Device,
        layout: &MaterialBindGroupLayout,
        capacity: usize,
    ) -> Result<Self, BindingError> {
        layout.expect_model(BindingModel::ArgumentBuffer)?;
        let stride = BindingTableArray::<T>::stride();
        if let Some(record_size) = layout.table_layout().record_size() {
            if record_size as usize != stride {
                return Err(BindingError::StrideMismatch {
                    expected: record_size as usize,
                    found: stride,
                });
            }
        }

        if capacity == 0 {
            return Err(BindingError::ZeroCapacity);
        }
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: layout.label.as_deref(),
            size: (capacity * stride) as u64,
            usage: wgpu::BufferUsages::STORAGE
                | wgpu::BufferUsages::COPY_DST
                | wgpu::BufferUsages::COPY_SRC,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: layout.label.as_deref(),
            layout: layout.raw(),
            entries: &[wgpu::BindGroupEntry {
                binding: layout.table_layout().base().index(),
                resource: buffer.as_entire_binding(),
            }],
        });
        log::debug!(
            "Created argument buffer for {} tables of {} ({} bytes each)",
            capacity,
            T::NAME,
            stride
        );

        Ok(Self {
            buffer,
            bind_group,
            capacity,
            stride,
        })
    }

    /// Copies the tables written since the last upload.
    ///
    /// Returns the byte range that was written, or `None` when nothing changed.
    pub fn upload<T: BindingTable>(
        &self,
        queue: &wgpu::Queue,
        tables: &mut BindingTableArray<T>,
    ) -> Result<Option<Range<usize>>, BindingError> {
        let stride = BindingTableArray::<T>::stride();
        if stride != self.stride {
            return Err(BindingError::StrideMismatch {
                expected: self.stride,
                found: stride,
            });
        }
        if tables.len() > self.capacity {
            return Err(BindingError::CapacityExceeded {
                required: tables.len(),
                capacity: self.capacity,
            });
        }

        let range = tables.take_dirty_range();
        if let Some(range) = &range {
            queue.write_buffer(
                &self.buffer,
                range.start as u64,
                &tables.as_bytes()[range.clone()],
            );
            log::trace!(
                "Uploaded {} bytes of {} tables at offset {}",
                range.len(),
                T::NAME,
                range.start
            );
        }
        Ok(range)
    }

    /// The bind group holding the storage buffer.
    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }

    /// The storage buffer.
    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    /// Number of tables the buffer holds.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lustre_core::binding::{BindingTableBuilder, Placeholders, TableIndex};
    use lustre_core::{Material, MaterialBindingTable, MaterialTextureRole};

    // Returns None if a suitable adapter cannot be found.
    fn create_test_device() -> Option<(wgpu::Device, wgpu::Queue)> {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor::new_without_display_handle());
        let adapter =
            pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions::default()))
                .ok()?;
        pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("Lustre Test Device"),
            ..Default::default()
        }))
        .ok()
    }

    // Copies `range` of `source` into a mappable buffer and reads it back.
    fn read_buffer(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        source: &wgpu::Buffer,
        range: Range<usize>,
    ) -> Vec<u8> {
        let size = range.len() as u64;
        let staging = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Lustre Test Readback"),
            size,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Lustre Test Readback"),
        });
        encoder.copy_buffer_to_buffer(source, range.start as u64, &staging, 0, size);
        queue.submit(std::iter::once(encoder.finish()));

        let slice = staging.slice(..);
        slice.map_async(wgpu::MapMode::Read, |res| {
            if let Err(e) = res {
                panic!("Readback map_async failed: {e:?}");
            }
        });
        device.poll(wgpu::PollType::wait_indefinitely()).unwrap();
        let data = slice.get_mapped_range();
        let bytes = data.to_vec();
        drop(data);
        staging.unmap();
        bytes
    }

    fn table_with_roughness(roughness: f32, handle: u32) -> MaterialBindingTable {
        BindingTableBuilder::new(Material {
            roughness,
            ..Material::default()
        })
        .build_with(&Placeholders::uniform(TextureHandle::new(handle)))
    }

    fn white_view(device: &wgpu::Device) -> wgpu::TextureView {
        device
            .create_texture(&wgpu::TextureDescriptor {
                label: Some("placeholder"),
                size: wgpu::Extent3d {
                    width: 1,
                    height: 1,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8Unorm,
                usage: wgpu::TextureUsages::TEXTURE_BINDING,
                view_formats: &[],
            })
            .create_view(&wgpu::TextureViewDescriptor::default())
    }

    #[test]
    fn discrete_bind_group_binds_all_slots_or_skips() {
        let Some((device, _queue)) = create_test_device() else {
            println!("Skipping bind group test: could not create test device.");
            return;
        };
        let mut pool = TextureViewPool::new();
        let placeholder = pool.insert(white_view(&device));
        let base_color = pool.insert(white_view(&device));

        let config = MaterialBindingConfig::default();
        let layout = MaterialBindGroupLayout::for_table::<MaterialBindingTable>(&device, &config)
            .unwrap();
        let table: MaterialBindingTable = BindingTableBuilder::new(Material::default())
            .texture(MaterialTextureRole::BaseColor, base_color)
            .build_with(&Placeholders::uniform(placeholder));

        let bind_group = create_material_bind_group(&device, &layout, &table, &pool).unwrap();
        assert_eq!(bind_group.constants_buffer().size(), 48);
    }

    #[test]
    fn updated_constants_reach_the_uniform_buffer_or_skips() {
        let Some((device, queue)) = create_test_device() else {
            println!("Skipping constants update test: could not create test device.");
            return;
        };
        let mut pool = TextureViewPool::new();
        let placeholder = pool.insert(white_view(&device));
        let layout = MaterialBindGroupLayout::for_table::<MaterialBindingTable>(
            &device,
            &MaterialBindingConfig::default(),
        )
        .unwrap();
        let table: MaterialBindingTable = BindingTableBuilder::new(Material::default())
            .build_with(&Placeholders::uniform(placeholder));
        let bind_group = create_material_bind_group(&device, &layout, &table, &pool).unwrap();

        let updated = Material {
            base_color: [0.2, 0.4, 0.6],
            metallic: 1.0,
            opacity: 0.25,
            ..Material::default()
        };
        bind_group.update_constants(&queue, &updated);

        let bytes = read_buffer(&device, &queue, bind_group.constants_buffer(), 0..48);
        assert_eq!(bytes, bytemuck::bytes_of(&updated));
        let read_back: Material = bytemuck::pod_read_unaligned(&bytes);
        approx::assert_relative_eq!(read_back.opacity, 0.25);
    }

    #[test]
    fn unknown_handle_is_reported_or_skips() {
        let Some((device, _queue)) = create_test_device() else {
            println!("Skipping bind group test: could not create test device.");
            return;
        };
        let mut pool = TextureViewPool::new();
        let known = pool.insert(white_view(&device));
        let missing = TextureHandle::new(77);

        let layout = MaterialBindGroupLayout::for_table::<MaterialBindingTable>(
            &device,
            &MaterialBindingConfig::default(),
        )
        .unwrap();
        let table: MaterialBindingTable = BindingTableBuilder::new(Material::default())
            .texture(MaterialTextureRole::Metallic, missing)
            .build_with(&Placeholders::uniform(known));

        let err = create_material_bind_group(&device, &layout, &table, &pool).unwrap_err();
        assert_eq!(
            err,
            BindingError::UnknownTexture {
                field: "metallic_texture".to_string(),
                handle: missing,
            }
        );
    }

    #[test]
    fn argument_buffer_rejects_overflow_or_skips() {
        let Some((device, queue)) = create_test_device() else {
            println!("Skipping argument buffer test: could not create test device.");
            return;
        };
        let config = MaterialBindingConfig {
            binding_model: BindingModel::ArgumentBuffer,
            ..MaterialBindingConfig::default()
        };
        let layout =
            MaterialBindGroupLayout::for_table::<MaterialBindingTable>(&device, &config).unwrap();
        let buffer = ArgumentBuffer::new::<MaterialBindingTable>(&device, &layout, 2).unwrap();
        assert_eq!(buffer.buffer().size(), 160);

        let table: MaterialBindingTable = BindingTableBuilder::new(Material::default())
            .build_with(&Placeholders::uniform(TextureHandle::new(0)));
        let mut tables = BindingTableArray::new();
        tables.push(table);
        tables.push(table);
        assert_eq!(buffer.upload(&queue, &mut tables).unwrap(), Some(0..160));
        assert_eq!(buffer.upload(&queue, &mut tables).unwrap(), None);

        tables.push(table);
        let err = buffer.upload(&queue, &mut tables).unwrap_err();
        assert_eq!(
            err,
            BindingError::CapacityExceeded {
                required: 3,
                capacity: 2
            }
        );
    }

    #[test]
    fn replaced_table_uploads_only_its_record_or_skips() {
        let Some((device, queue)) = create_test_device() else {
            println!("Skipping argument buffer test: could not create test device.");
            return;
        };
        let config = MaterialBindingConfig {
            binding_model: BindingModel::ArgumentBuffer,
            ..MaterialBindingConfig::default()
        };
        let layout =
            MaterialBindGroupLayout::for_table::<MaterialBindingTable>(&device, &config).unwrap();
        let buffer = ArgumentBuffer::new::<MaterialBindingTable>(&device, &layout, 3).unwrap();

        let mut tables = BindingTableArray::new();
        for i in 0..3 {
            tables.push(table_with_roughness(0.1 * i as f32, i));
        }
        assert_eq!(buffer.upload(&queue, &mut tables).unwrap(), Some(0..240));

        let replacement = table_with_roughness(0.9, 42);
        tables.replace(TableIndex(1), replacement).unwrap();
        let range = buffer.upload(&queue, &mut tables).unwrap().unwrap();
        assert_eq!(range, 80..160);

        let written = read_buffer(&device, &queue, buffer.buffer(), range.clone());
        assert_eq!(written, bytemuck::bytes_of(&replacement));
        let untouched = read_buffer(&device, &queue, buffer.buffer(), 160..240);
        let last = tables.get(TableIndex(2)).unwrap();
        assert_eq!(untouched, bytemuck::bytes_of(last));
    }

    #[test]
    fn zero_capacity_argument_buffer_is_rejected_or_skips() {
        let Some((device, _queue)) = create_test_device() else {
            println!("Skipping argument buffer test: could not create test device.");
            return;
        };
        let config = MaterialBindingConfig {
            binding_model: BindingModel::ArgumentBuffer,
            ..MaterialBindingConfig::default()
        };
        let layout =
            MaterialBindGroupLayout::for_table::<MaterialBindingTable>(&device, &config).unwrap();
        let err = ArgumentBuffer::new::<MaterialBindingTable>(&device, &layout, 0).unwrap_err();
        assert_eq!(err, BindingError::ZeroCapacity);
    }

    #[test]
    fn models_are_not_interchangeable_or_skips() {
        let Some((device, _queue)) = create_test_device() else {
            println!("Skipping binding model test: could not create test device.");
            return;
        };
        let layout = MaterialBindGroupLayout::for_table::<MaterialBindingTable>(
            &device,
            &MaterialBindingConfig::default(),
        )
        .unwrap();
        let err = ArgumentBuffer::new::<MaterialBindingTable>(&device, &layout, 4).unwrap_err();
        assert_eq!(
            err,
            BindingError::WrongBindingModel {
                expected: BindingModel::ArgumentBuffer,
                found: BindingModel::Discrete,
            }
        );
    }
}
