// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Expression parser tests split into logical modules.

#[macro_use]
mod macros;

mod errors;
mod tokens;
