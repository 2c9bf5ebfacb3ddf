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

//! Settings controlling where a material binding table is bound.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::binding::BindingModel;
use crate::renderer::api::util::enums::ShaderStage;
use crate::renderer::api::util::flags::ShaderStageFlags;

/// Where and how a material binding table is presented to shaders.
///
/// Every field has a default, so a configuration file only lists what it
/// overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialBindingConfig {
    /// Bind group index (`@group`) of the table.
    pub group: u32,
    /// Slot of the first texture field.
    pub base_slot: u32,
    /// Stages that read the table.
    pub stages: Vec<ShaderStage>,
    /// Discrete bindings or a single argument buffer.
    pub binding_model: BindingModel,
    /// Debug label for the GPU objects created from this configuration.
    pub label: Option<String>,
}

impl Default for MaterialBindingConfig {
    fn default() -> Self {
        Self {
            group: 1,
            base_slot: 0,
            stages: vec![ShaderStage::Fragment],
            binding_model: BindingModel::Discrete,
            label: None,
        }
    }
}

impl MaterialBindingConfig {
    /// The stages as a visibility mask.
    pub fn visibility(&self) -> ShaderStageFlags {
        self.stages.iter().copied().collect()
    }

    /// Parses a configuration from JSON.
    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).context("Failed to parse material binding configuration")
    }

    /// Reads a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).with_context(|| {
            format!("Failed to read material binding configuration '{}'", path.display())
        })?;
        let config = Self::from_json_str(&json)
            .with_context(|| format!("Invalid configuration in '{}'", path.display()))?;
        log::debug!("Loaded material binding configuration from '{}'", path.display());
        Ok(config)
    }
}
