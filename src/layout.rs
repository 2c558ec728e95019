//! Layout information on resolved containers
//!
//! The [`LayoutRegistry`] holds a [`LayoutInfo`] per container type, keyed
//! by [`TypeId`]. It answers the question that motivates this crate: how
//! much memory does the optional cost compared to the payload and to
//! [`Option`]?

use std::{
    any::{type_name, TypeId},
    collections::HashMap,
    fmt,
    num::NonZeroU32,
    ptr::NonNull,
    rc::Rc,
};

use crate::{
    error::RegistrationError, Auto, BoolSentinel, Optional, Select,
    Selected, Sentinel,
};

#[derive(Clone, Debug)]
pub struct LayoutInfo {
    /// Name under which the layout is registered
    pub name: String,

    /// The name of the payload type in Rust
    pub payload: &'static str,

    /// The name of the configuration type in Rust
    pub config: &'static str,

    /// The size of the payload in bytes
    pub payload_size: usize,

    /// The size of the optional in bytes
    pub size: usize,

    /// The memory alignment of the optional in bytes
    pub alignment: usize,

    /// The size of `Option<T>` in bytes, for comparison
    pub option_size: usize,

    /// The rule that resolved the encoding
    pub selected: Selected,

    /// The [`TypeId`] of the optional
    pub type_id: TypeId,
}

impl LayoutInfo {
    pub fn of<T: 'static, C: Select<T> + 'static>(
        name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            payload: type_name::<T>(),
            config: type_name::<C>(),
            payload_size: size_of::<T>(),
            size: size_of::<Optional<T, C>>(),
            alignment: align_of::<Optional<T, C>>(),
            option_size: size_of::<Option<T>>(),
            selected: Optional::<T, C>::SELECTED,
            type_id: TypeId::of::<Optional<T, C>>(),
        }
    }

    /// Bytes the optional needs on top of the payload
    pub fn overhead(&self) -> usize {
        self.size - self.payload_size
    }
}

impl fmt::Display for LayoutInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} bytes for a {}-byte payload, {}",
            self.name, self.size, self.payload_size, self.selected
        )
    }
}

/// A map from [`TypeId`] of an optional to its [`LayoutInfo`]
#[derive(Default)]
pub struct LayoutRegistry {
    map: HashMap<TypeId, LayoutInfo>,
    names: HashMap<String, TypeId>,
    order: Vec<TypeId>,
}

impl LayoutRegistry {
    /// A registry holding the layouts of built-in payloads
    pub fn builtin() -> Self {
        let mut registry = Self::default();
        for info in builtin_layouts() {
            registry.insert(info);
        }
        registry
    }

    /// Register the layout of `Optional<T, C>` under `name`
    ///
    /// Registering the same type under the same name again returns the
    /// existing information.
    ///
    /// The layout is only known for valid configurations. An invalid one
    /// fails to compile as soon as its rule is resolved:
    ///
    /// ```compile_fail
    /// use tinyopt::{Optional, Selected, Sentinel};
    ///
    /// const _: Selected = Optional::<u8, Sentinel<300>>::SELECTED;
    /// ```
    pub fn store<T: 'static, C: Select<T> + 'static>(
        &mut self,
        name: &str,
    ) -> Result<LayoutInfo, RegistrationError> {
        let info = LayoutInfo::of::<T, C>(name);

        if let Some(existing) = self.map.get(&info.type_id) {
            if existing.name == name {
                return Ok(existing.clone());
            }
            log::debug!(
                "refusing to register {} again as {name}",
                existing.name
            );
            return Err(RegistrationError::AlreadyRegistered {
                rust_name: type_name::<Optional<T, C>>(),
                existing: existing.name.clone(),
                new: name.into(),
            });
        }

        if let Some(existing) = self.get_by_name(name) {
            return Err(RegistrationError::DuplicateName {
                name: name.into(),
                existing: existing.payload,
                new: info.payload,
            });
        }

        self.insert(info.clone());
        Ok(info)
    }

    fn insert(&mut self, info: LayoutInfo) {
        log::trace!(
            "registering layout {}: {} with {} ({})",
            info.name,
            info.payload,
            info.config,
            info.selected
        );
        self.names.insert(info.name.clone(), info.type_id);
        self.order.push(info.type_id);
        self.map.insert(info.type_id, info);
    }

    pub fn get(&self, id: TypeId) -> Option<&LayoutInfo> {
        self.map.get(&id)
    }

    pub fn get_by_name(&self, name: &str) -> Option<&LayoutInfo> {
        self.names.get(name).and_then(|id| self.map.get(id))
    }

    /// All layouts in registration order
    pub fn iter(&self) -> impl Iterator<Item = &LayoutInfo> + '_ {
        self.order.iter().filter_map(|id| self.map.get(id))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

fn builtin_layouts() -> Vec<LayoutInfo> {
    vec![
        LayoutInfo::of::<f64, Auto>("f64"),
        LayoutInfo::of::<f32, Auto>("f32"),
        LayoutInfo::of::<bool, Auto>("bool"),
        LayoutInfo::of::<char, Auto>("char"),
        LayoutInfo::of::<*const u8, Auto>("*const u8"),
        LayoutInfo::of::<*const u8, Sentinel<{ usize::MAX as i128 }>>(
            "*const u8, sentinel usize::MAX",
        ),
        LayoutInfo::of::<&'static str, Auto>("&str"),
        LayoutInfo::of::<NonNull<u8>, Auto>("NonNull<u8>"),
        LayoutInfo::of::<Box<u64>, Auto>("Box<u64>"),
        LayoutInfo::of::<Rc<str>, Auto>("Rc<str>"),
        LayoutInfo::of::<NonZeroU32, Auto>("NonZeroU32"),
        LayoutInfo::of::<i32, Auto>("i32"),
        LayoutInfo::of::<i32, Sentinel<-1>>("i32, sentinel -1"),
        LayoutInfo::of::<u8, Sentinel<255>>("u8, sentinel 255"),
        LayoutInfo::of::<bool, BoolSentinel<false>>("bool, sentinel false"),
        LayoutInfo::of::<u64, Auto>("u64"),
        LayoutInfo::of::<String, Auto>("String"),
        LayoutInfo::of::<Vec<u8>, Auto>("Vec<u8>"),
    ]
}
