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

//! Generic rendering enums.

use serde::{Deserialize, Serialize};

/// A programmable stage that may read a binding table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShaderStage {
    /// The vertex shader stage.
    Vertex,
    /// The fragment (or pixel) shader stage.
    Fragment,
    /// The compute shader stage.
    Compute,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shader_stage_deserializes_from_lowercase() {
        let stage: ShaderStage = serde_json::from_str("\"fragment\"").unwrap();
        assert_eq!(stage, ShaderStage::Fragment);
        assert!(serde_json::from_str::<ShaderStage>("\"Fragment\"").is_err());
    }
}
