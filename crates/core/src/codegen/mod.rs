//! Source text generation for the virtual layouts module.
//!
//! Everything here is a pure function of options and scan results; the host
//! compiles the output, so tests assert on the text itself.

pub mod client;
pub mod client_side;
pub mod imports;

pub use client::get_client_code;
pub use client_side::{ClientSideOptions, create_virtual_module_code};
pub use imports::get_import_code;

/// Quote a string as a JS string literal.
pub(crate) fn js_string(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

/// Route wrapping shared by both generation modes. Expects `layouts` and
/// `DEFAULT_LAYOUT` to be in scope.
pub(crate) const ROUTE_HELPERS: &str = r#"
function resolveLayoutName(route) {
  const layout = route.meta?.layout
  if (layout === false)
    return null
  return layout || DEFAULT_LAYOUT
}

function wrapRoute(route, name) {
  return {
    path: route.path,
    component: layouts[name],
    children: route.path === '/' ? [route] : [{ ...route, path: '' }],
    meta: {
      isLayout: true,
    },
  }
}

function deepSetupLayout(routes, top = true) {
  return routes.map((route) => {
    if (route.children?.length > 0)
      route = { ...route, children: deepSetupLayout(route.children, false) }

    if (top) {
      // Route groups from file-based routers already nest their own layout route
      const grouped = !route.component
        && route.children?.find(r => (r.path === '' || r.path === '/') && r.meta?.isLayout)
      if (grouped)
        return route

      const name = resolveLayoutName(route)
      return name === null ? route : wrapRoute(route, name)
    }

    if (route.meta?.layout)
      return wrapRoute(route, route.meta.layout)

    return route
  })
}

export function setupLayouts(routes) {
  return deepSetupLayout(routes)
}

export function createGetRoutes(router, withLayout = true) {
  return () => {
    const routes = router.getRoutes()
    if (!withLayout)
      return routes

    return routes
      .filter(route => !route.meta?.isLayout)
      .map((route) => {
        const name = resolveLayoutName(route)
        return name === null ? route : wrapRoute(route, name)
      })
  }
}
"#;
