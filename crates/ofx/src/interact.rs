//! Overlay and custom-widget interacts.
//!
//! An interact is its own little plugin: the host drives it through a
//! separate entry point with describe, create, draw, pen, key and focus
//! actions. `interact_entry::<I>` is that entry point, monomorphized over
//! the user's [`Interact`] type and handed to
//! `EffectDescriptor::set_overlay_interact` or a parameter descriptor's
//! `set_interact`. Instances register themselves with the owning effect so
//! `EffectInstance::redraw_interacts` can reach them.

use std::ffi::CStr;
use std::os::raw::c_void;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use ofx_sys::{
    action, prop, status, OfxImageEffectHandle, OfxInteractHandle, OfxPropertySetHandle,
    OfxStatus, OfxTime,
};

use crate::error::{check_status, OfxResult};
use crate::image_effect::error_to_status;
use crate::property::PropertySet;
use crate::suites::{suite_fn, Suites};

/// The interact descriptor, valid during the interact's describe action.
pub struct InteractDescriptor {
    props: PropertySet,
}

impl InteractDescriptor {
    pub fn props(&self) -> &PropertySet {
        &self.props
    }

    /// Whether the host gives the interact an alpha channel to draw into.
    pub fn has_alpha(&self) -> OfxResult<bool> {
        self.props.get_bool(prop::INTERACT_HAS_ALPHA)
    }

    /// Bit depth of the interact's frame buffer.
    pub fn bit_depth(&self) -> OfxResult<i32> {
        self.props.get_int(prop::INTERACT_BIT_DEPTH)
    }
}

/// A live interact's host-side state: handle, properties, and the owning
/// effect. Passed to every [`Interact`] method.
pub struct InteractInstance {
    handle: OfxInteractHandle,
    props: PropertySet,
    effect: OfxImageEffectHandle,
    suites: Arc<Suites>,
}

impl InteractInstance {
    pub fn handle(&self) -> OfxInteractHandle {
        self.handle
    }

    pub fn props(&self) -> &PropertySet {
        &self.props
    }

    /// Handle of the effect instance this interact belongs to.
    pub fn effect_handle(&self) -> OfxImageEffectHandle {
        self.effect
    }

    /// Redraw only when the named parameter changes.
    pub fn add_slave_to_param(&self, name: &str) -> OfxResult<()> {
        let n = self.props.append_index(prop::INTERACT_SLAVE_TO_PARAM)?;
        self.props.set_string_at(prop::INTERACT_SLAVE_TO_PARAM, n, name)
    }

    pub fn swap_buffers(&self) -> OfxResult<()> {
        let f = suite_fn!(self.suites.interact()?, interact_swap_buffers)?;
        check_status(unsafe { f(self.handle) })
    }

    pub fn request_redraw(&self) -> OfxResult<()> {
        let f = suite_fn!(self.suites.interact()?, interact_redraw)?;
        check_status(unsafe { f(self.handle) })
    }
}

fn read_pair(props: &PropertySet, name: &CStr) -> (f64, f64) {
    (
        props.get_double_at(name, 0).unwrap_or(1.0),
        props.get_double_at(name, 1).unwrap_or(1.0),
    )
}

/// Arguments common to draw and focus actions.
#[derive(Debug, Clone)]
pub struct DrawArgs {
    pub time: OfxTime,
    pub render_scale: (f64, f64),
    /// Canonical size of one screen pixel.
    pub pixel_scale: (f64, f64),
    pub background_colour: (f64, f64, f64),
}

impl DrawArgs {
    fn read(in_args: &PropertySet, interact_props: &PropertySet) -> Self {
        Self {
            time: in_args.get_double(prop::TIME).unwrap_or(0.0),
            render_scale: read_pair(in_args, prop::RENDER_SCALE),
            pixel_scale: read_pair(interact_props, prop::INTERACT_PIXEL_SCALE),
            background_colour: (
                interact_props.get_double_at(prop::INTERACT_BACKGROUND_COLOUR, 0).unwrap_or(0.0),
                interact_props.get_double_at(prop::INTERACT_BACKGROUND_COLOUR, 1).unwrap_or(0.0),
                interact_props.get_double_at(prop::INTERACT_BACKGROUND_COLOUR, 2).unwrap_or(0.0),
            ),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PenArgs {
    pub time: OfxTime,
    pub render_scale: (f64, f64),
    pub pixel_scale: (f64, f64),
    /// Pen position in canonical coordinates.
    pub pen_position: (f64, f64),
    /// Pen position in viewport pixels.
    pub pen_viewport_position: (i32, i32),
    pub pen_pressure: f64,
}

impl PenArgs {
    fn read(in_args: &PropertySet, interact_props: &PropertySet) -> Self {
        Self {
            time: in_args.get_double(prop::TIME).unwrap_or(0.0),
            render_scale: read_pair(in_args, prop::RENDER_SCALE),
            pixel_scale: read_pair(interact_props, prop::INTERACT_PIXEL_SCALE),
            pen_position: (
                in_args.get_double_at(prop::INTERACT_PEN_POSITION, 0).unwrap_or(0.0),
                in_args.get_double_at(prop::INTERACT_PEN_POSITION, 1).unwrap_or(0.0),
            ),
            pen_viewport_position: (
                in_args.get_int_at(prop::INTERACT_PEN_VIEWPORT_POSITION, 0).unwrap_or(0),
                in_args.get_int_at(prop::INTERACT_PEN_VIEWPORT_POSITION, 1).unwrap_or(0),
            ),
            pen_pressure: in_args.get_double(prop::INTERACT_PEN_PRESSURE).unwrap_or(0.0),
        }
    }
}

#[derive(Debug, Clone)]
pub struct KeyArgs {
    pub time: OfxTime,
    /// The key's symbolic code.
    pub key_sym: i32,
    /// UTF-8 text the key produced, empty for modifiers.
    pub key_string: String,
}

impl KeyArgs {
    fn read(in_args: &PropertySet) -> Self {
        Self {
            time: in_args.get_double(prop::TIME).unwrap_or(0.0),
            key_sym: in_args.get_int(prop::KEY_SYM).unwrap_or(0),
            key_string: in_args.get_string(prop::KEY_STRING).unwrap_or_default(),
        }
    }
}

/// User-side interact behavior. Pen and key handlers return true when the
/// event was consumed; false lets the host keep it.
#[allow(unused_variables)]
pub trait Interact: Sized + Send + 'static {
    fn describe(desc: &mut InteractDescriptor) -> OfxResult<()> {
        Ok(())
    }

    fn new(ctx: &InteractInstance) -> OfxResult<Self>;

    fn draw(&mut self, ctx: &InteractInstance, args: &DrawArgs) -> OfxResult<()> {
        Ok(())
    }

    fn pen_motion(&mut self, ctx: &InteractInstance, args: &PenArgs) -> OfxResult<bool> {
        Ok(false)
    }

    fn pen_down(&mut self, ctx: &InteractInstance, args: &PenArgs) -> OfxResult<bool> {
        Ok(false)
    }

    fn pen_up(&mut self, ctx: &InteractInstance, args: &PenArgs) -> OfxResult<bool> {
        Ok(false)
    }

    fn key_down(&mut self, ctx: &InteractInstance, args: &KeyArgs) -> OfxResult<bool> {
        Ok(false)
    }

    fn key_up(&mut self, ctx: &InteractInstance, args: &KeyArgs) -> OfxResult<bool> {
        Ok(false)
    }

    fn key_repeat(&mut self, ctx: &InteractInstance, args: &KeyArgs) -> OfxResult<bool> {
        Ok(false)
    }

    fn gain_focus(&mut self, ctx: &InteractInstance, args: &DrawArgs) -> OfxResult<()> {
        Ok(())
    }

    fn lose_focus(&mut self, ctx: &InteractInstance, args: &DrawArgs) -> OfxResult<()> {
        Ok(())
    }
}

struct Holder<I: Interact> {
    ctx: InteractInstance,
    state: I,
}

fn interact_props(suites: &Arc<Suites>, handle: OfxInteractHandle) -> OfxResult<PropertySet> {
    let f = suite_fn!(suites.interact()?, interact_get_property_set)?;
    let mut props_handle = std::ptr::null_mut();
    check_status(unsafe { f(handle, &mut props_handle) })?;
    Ok(PropertySet::new(props_handle, Arc::clone(suites)))
}

fn dispatch_interact<I: Interact>(
    action: &CStr,
    handle: OfxInteractHandle,
    in_args: OfxPropertySetHandle,
) -> OfxResult<OfxStatus> {
    let suites = match crate::dispatch::current_suites() {
        Some(s) => s,
        None => return Ok(status::FAILED),
    };
    let props = interact_props(&suites, handle)?;

    if action == action::DESCRIBE {
        let mut desc = InteractDescriptor { props };
        I::describe(&mut desc)?;
        return Ok(status::OK);
    }

    if action == action::CREATE_INSTANCE {
        let effect = props.get_pointer(prop::EFFECT_INSTANCE)? as OfxImageEffectHandle;
        let ctx = InteractInstance { handle, props, effect, suites };
        let state = I::new(&ctx)?;
        let raw = Box::into_raw(Box::new(Holder { ctx, state }));
        let stored =
            unsafe { &*raw }.ctx.props.set_pointer(prop::INSTANCE_DATA, raw as *mut c_void);
        if let Err(err) = stored {
            drop(unsafe { Box::from_raw(raw) });
            return Err(err);
        }
        crate::dispatch::register_effect_interact(effect, handle);
        return Ok(status::OK);
    }

    let data = props.get_pointer(prop::INSTANCE_DATA)?;
    if data.is_null() {
        return Ok(status::ERR_BAD_HANDLE);
    }

    if action == action::DESTROY_INSTANCE {
        let holder = unsafe { Box::from_raw(data as *mut Holder<I>) };
        crate::dispatch::unregister_effect_interact(holder.ctx.effect, handle);
        props.set_pointer(prop::INSTANCE_DATA, std::ptr::null_mut()).ok();
        drop(holder);
        return Ok(status::OK);
    }

    let holder = unsafe { &mut *(data as *mut Holder<I>) };
    let in_args = PropertySet::new(in_args, Arc::clone(holder.ctx.props.suites()));
    let ctx = &holder.ctx;
    let state = &mut holder.state;

    let consumed_to_status = |consumed: bool| {
        if consumed {
            status::OK
        } else {
            status::REPLY_DEFAULT
        }
    };

    let stat = if action == action::INTERACT_DRAW {
        state.draw(ctx, &DrawArgs::read(&in_args, &ctx.props))?;
        status::OK
    } else if action == action::INTERACT_PEN_MOTION {
        consumed_to_status(state.pen_motion(ctx, &PenArgs::read(&in_args, &ctx.props))?)
    } else if action == action::INTERACT_PEN_DOWN {
        consumed_to_status(state.pen_down(ctx, &PenArgs::read(&in_args, &ctx.props))?)
    } else if action == action::INTERACT_PEN_UP {
        consumed_to_status(state.pen_up(ctx, &PenArgs::read(&in_args, &ctx.props))?)
    } else if action == action::INTERACT_KEY_DOWN {
        consumed_to_status(state.key_down(ctx, &KeyArgs::read(&in_args))?)
    } else if action == action::INTERACT_KEY_UP {
        consumed_to_status(state.key_up(ctx, &KeyArgs::read(&in_args))?)
    } else if action == action::INTERACT_KEY_REPEAT {
        consumed_to_status(state.key_repeat(ctx, &KeyArgs::read(&in_args))?)
    } else if action == action::INTERACT_GAIN_FOCUS {
        state.gain_focus(ctx, &DrawArgs::read(&in_args, &ctx.props))?;
        status::OK
    } else if action == action::INTERACT_LOSE_FOCUS {
        state.lose_focus(ctx, &DrawArgs::read(&in_args, &ctx.props))?;
        status::OK
    } else {
        status::REPLY_DEFAULT
    };
    Ok(stat)
}

/// The C entry point for an interact of type `I`. Hand this to
/// `set_overlay_interact` or a parameter's `set_interact`.
pub unsafe extern "C" fn interact_entry<I: Interact>(
    action: *const std::os::raw::c_char,
    handle: *const c_void,
    in_args: OfxPropertySetHandle,
    _out_args: OfxPropertySetHandle,
) -> OfxStatus {
    if action.is_null() || handle.is_null() {
        return status::ERR_BAD_HANDLE;
    }
    let action = CStr::from_ptr(action);
    let handle = handle as OfxInteractHandle;
    match catch_unwind(AssertUnwindSafe(|| dispatch_interact::<I>(action, handle, in_args))) {
        Ok(Ok(stat)) => stat,
        Ok(Err(err)) => {
            log::error!("interact action {:?} failed: {}", action, err);
            error_to_status(&err)
        }
        Err(_) => {
            log::error!("interact action {:?} panicked", action);
            status::FAILED
        }
    }
}
