// Copyright 2024 The mintvcs Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Hex string helpers shared by object identity and ref-prefix resolution.

/// The hex alphabet this system accepts; unlike object identities elsewhere,
/// mintvcs identities are always lowercase.
const HEX_DIGITS: &str = "0123456789abcdef";

/// Returns true iff every character of `s` is a lowercase hex digit.
pub fn is_lower_hex(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| HEX_DIGITS.as_bytes().contains(&b))
}

/// Returns true iff `s` is exactly `len` lowercase hex digits.
pub fn is_lower_hex_of_len(s: &str, len: usize) -> bool {
    s.len() == len && is_lower_hex(s)
}
