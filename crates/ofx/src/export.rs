//! The two C symbols every plugin binary must export.

/// Exports `OfxGetNumberOfPlugins` and `OfxGetPlugin` for the given
/// factories. Invoke once per cdylib:
///
/// ```ignore
/// ofx::export_ofx!(MyFactory::default(), OtherFactory::default());
/// ```
#[macro_export]
macro_rules! export_ofx {
    ($($factory:expr),+ $(,)?) => {
        #[no_mangle]
        pub extern "C" fn OfxGetNumberOfPlugins() -> ::std::os::raw::c_int {
            $crate::dispatch::init_registry(|| {
                vec![$(::std::boxed::Box::new($factory)
                    as ::std::boxed::Box<dyn $crate::PluginFactory>),+]
            }) as ::std::os::raw::c_int
        }

        #[no_mangle]
        pub extern "C" fn OfxGetPlugin(
            nth: ::std::os::raw::c_int,
        ) -> *const $crate::ofx_sys::OfxPlugin {
            // The host may probe plugins before asking how many there are.
            OfxGetNumberOfPlugins();
            if nth < 0 {
                return ::std::ptr::null();
            }
            $crate::dispatch::plugin_struct(nth as usize)
        }
    };
}
