//=========================================================================
// Game Objects
//=========================================================================
//
// The unit of simulation living inside a scene.
//
// Architecture:
//   GameObject (trait, user type)
//     └─ ObjectCore (embedded state: id, name, flags, params)
//
//   ObjectRegistry ── holds ObjectHandle = Rc<RefCell<dyn GameObject>>
//
// Lifecycle:
//   new → initialize() (params applied once) → update()* → destroy()
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use log::debug;

//=== Module Declarations =================================================

mod id_allocator;
pub mod registry;

//=== Public API ==========================================================

pub use id_allocator::{IdAllocator, ObjectId};
pub use registry::ObjectRegistry;

/// Key/value configuration applied to an object when it is initialized.
pub type ObjectParams = toml::Table;

/// Single configuration value.
pub type ParamValue = toml::Value;

/// Shared handle to a game object.
///
/// The registry keeps one clone for membership; gameplay code may keep
/// others. Membership and identity are decided by [`ObjectId`].
pub type ObjectHandle = Rc<RefCell<dyn GameObject>>;

/// Wraps an object into an [`ObjectHandle`].
pub fn handle<O: GameObject>(object: O) -> ObjectHandle {
    Rc::new(RefCell::new(object))
}

//=== ObjectKind ==========================================================

/// Explicit type tag used by kind lookups.
///
/// User object types declare their own constants:
/// ```
/// use cadence_engine::core::object::ObjectKind;
///
/// const COIN: ObjectKind = ObjectKind::new("coin");
/// assert_eq!(COIN.name(), "coin");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectKind(&'static str);

impl ObjectKind {
    /// Kind reported by objects that do not declare one.
    pub const CLASSIC: ObjectKind = ObjectKind("classicObject");

    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub fn name(self) -> &'static str {
        self.0
    }
}

impl Default for ObjectKind {
    fn default() -> Self {
        Self::CLASSIC
    }
}

//=== ObjectCore ==========================================================

/// State every game object carries.
///
/// Embed one in your object type and expose it through
/// [`GameObject::core`] / [`GameObject::core_mut`].
#[derive(Debug, Clone)]
pub struct ObjectCore {
    id: ObjectId,

    /// Display name. Duplicates are allowed.
    pub name: String,

    /// Deferred removal request, honored on the next registry sweep.
    pub kill: bool,

    /// Whether the registry calls [`GameObject::update`] each tick.
    pub update_enabled: bool,

    initialized: bool,
    params: Option<ObjectParams>,
}

impl ObjectCore {
    /// Creates state with a fresh identity and the default name `GameObject_<id>`.
    pub fn new(ids: &IdAllocator) -> Self {
        let id = ids.next();
        Self {
            id,
            name: format!("GameObject_{}", id),
            kill: false,
            update_enabled: false,
            initialized: false,
            params: None,
        }
    }

    /// Same as [`ObjectCore::new`], with params applied at initialization.
    pub fn with_params(ids: &IdAllocator, params: ObjectParams) -> Self {
        let mut core = Self::new(ids);
        core.params = Some(params);
        core
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// True between initialization and destruction.
    pub fn initialized(&self) -> bool {
        self.initialized
    }

    /// Marks the object as no longer initialized.
    ///
    /// Called by the default [`GameObject::destroy`]; overrides should call
    /// it too.
    pub fn clear_initialized(&mut self) {
        self.initialized = false;
    }

    /// Params still waiting to be applied, if any.
    pub fn pending_params(&self) -> Option<&ObjectParams> {
        self.params.as_ref()
    }
}

impl fmt::Display for ObjectCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GameObject id: {} name: {}", self.id, self.name)
    }
}

//=== GameObject Trait ====================================================

/// Behavior of an object managed by a scene.
///
/// Only the core accessors are required:
///
/// ```
/// use cadence_engine::core::object::{GameObject, IdAllocator, ObjectCore};
///
/// struct Hero {
///     core: ObjectCore,
/// }
///
/// impl GameObject for Hero {
///     fn core(&self) -> &ObjectCore { &self.core }
///     fn core_mut(&mut self) -> &mut ObjectCore { &mut self.core }
/// }
///
/// let ids = IdAllocator::new();
/// let mut hero = Hero { core: ObjectCore::new(&ids) };
/// hero.initialize();
/// assert!(hero.core().initialized());
/// ```
pub trait GameObject: 'static {
    fn core(&self) -> &ObjectCore;

    fn core_mut(&mut self) -> &mut ObjectCore;

    /// Tag matched by kind lookups.
    fn kind(&self) -> ObjectKind {
        ObjectKind::CLASSIC
    }

    /// Applies the configuration params and marks the object initialized.
    ///
    /// Overrides should call [`apply_params`] to keep that behavior.
    fn initialize(&mut self) {
        apply_params(self);
    }

    /// Receives a param that is not one of the core keys.
    ///
    /// Returns whether the key was recognized.
    fn apply_param(&mut self, _key: &str, _value: &ParamValue) -> bool {
        false
    }

    /// Per-tick logic, called only while `update_enabled` is set.
    fn update(&mut self, _delta: f64) {}

    /// Releases whatever the object holds. Safe to call repeatedly.
    fn destroy(&mut self) {
        self.core_mut().clear_initialized();
    }
}

/// Consumes the object's pending params and marks it initialized.
///
/// `name` and `update_enabled` are handled here; every other key goes to
/// [`GameObject::apply_param`].
pub fn apply_params<O: GameObject + ?Sized>(object: &mut O) {
    if let Some(params) = object.core_mut().params.take() {
        for (key, value) in params {
            match (key.as_str(), value) {
                ("name", ParamValue::String(name)) => object.core_mut().name = name,
                ("update_enabled", ParamValue::Boolean(enabled)) => {
                    object.core_mut().update_enabled = enabled
                }
                (_, value) => {
                    if !object.apply_param(&key, &value) {
                        debug!("{}: ignoring unknown param {:?}", object.core(), key);
                    }
                }
            }
        }
    }

    object.core_mut().initialized = true;
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testing::ProbeObject;

    //--- Construction -----------------------------------------------------

    #[test]
    fn default_name_uses_id() {
        let ids = IdAllocator::new();
        let o1 = ProbeObject::new(&ids);
        let o2 = ProbeObject::new(&ids);

        assert!(o1.core().name.starts_with("GameObject_"));
        assert_ne!(o1.core().name, o2.core().name);
        assert!(o1.core().id() < o2.core().id());
    }

    #[test]
    fn default_name_survives_initialization() {
        let ids = IdAllocator::new();
        let mut o = ProbeObject::new(&ids);
        let before = o.core().name.clone();

        o.initialize();

        assert_eq!(o.core().name, before);
    }

    #[test]
    fn default_kind_is_classic() {
        let ids = IdAllocator::new();
        let o = ProbeObject::new(&ids);
        assert_eq!(o.kind(), ObjectKind::CLASSIC);
        assert_eq!(ObjectKind::default().name(), "classicObject");
    }

    //--- Initialization ---------------------------------------------------

    #[test]
    fn initialize_and_destroy_toggle_initialized() {
        let ids = IdAllocator::new();
        let mut o = ProbeObject::new(&ids);
        assert!(!o.core().initialized());

        o.initialize();
        assert!(o.core().initialized());

        o.destroy();
        assert!(!o.core().initialized());

        o.destroy();
        assert!(!o.core().initialized());
    }

    #[test]
    fn name_param_overrides_default() {
        let ids = IdAllocator::new();
        let mut params = ObjectParams::new();
        params.insert("name".into(), ParamValue::String("test name".into()));
        let mut o = ProbeObject::with_params(&ids, params);

        o.initialize();

        assert_eq!(o.core().name, "test name");
    }

    #[test]
    fn custom_params_reach_apply_param() {
        let ids = IdAllocator::new();
        let params: ObjectParams = toml::from_str(
            r#"
                score = 37
                update_enabled = true
                label = "string"
            "#,
        )
        .unwrap();
        let mut o = ProbeObject::with_params(&ids, params);

        o.initialize();

        assert_eq!(o.score, Some(37));
        assert_eq!(o.label.as_deref(), Some("string"));
        assert!(o.core().update_enabled);
    }

    #[test]
    fn only_given_params_are_set() {
        let ids = IdAllocator::new();
        let params: ObjectParams = toml::from_str(r#"label = "only""#).unwrap();
        let mut o = ProbeObject::with_params(&ids, params);

        o.initialize();

        assert_eq!(o.score, None);
        assert_eq!(o.label.as_deref(), Some("only"));
        assert!(!o.core().update_enabled);
    }

    #[test]
    fn params_are_applied_once() {
        let ids = IdAllocator::new();
        let params: ObjectParams = toml::from_str(r#"name = "first""#).unwrap();
        let mut o = ProbeObject::with_params(&ids, params);

        o.initialize();
        assert!(o.core().pending_params().is_none());

        o.core_mut().name = "renamed".into();
        o.destroy();
        o.initialize();

        assert_eq!(o.core().name, "renamed");
    }

    #[test]
    fn display_names_object() {
        let ids = IdAllocator::new();
        let o = ProbeObject::new(&ids);
        assert_eq!(o.core().to_string(), "GameObject id: 0 name: GameObject_0");
    }
}
