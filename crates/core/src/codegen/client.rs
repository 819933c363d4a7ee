use super::{ROUTE_HELPERS, js_string};
use crate::options::ResolvedOptions;

/// Wrap scanned imports with the router helpers.
pub fn get_client_code(import_code: &str, options: &ResolvedOptions) -> String {
    format!(
        "{}\nconst DEFAULT_LAYOUT = {};\n{}",
        import_code,
        js_string(&options.default_layout),
        ROUTE_HELPERS
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::get_import_code;
    use crate::options::UserOptions;
    use crate::project::{FileContainer, LayoutFile};
    use std::path::Path;

    #[test]
    fn test_client_code_layout() {
        let user = UserOptions::default().with_default_layout("main");
        let options = ResolvedOptions::resolve_with_ssg(user, false);
        let imports = "export const layouts = {\n};\n";

        let code = get_client_code(imports, &options);
        assert!(code.starts_with(imports));
        assert!(code.contains("const DEFAULT_LAYOUT = \"main\";"));
        assert!(code.contains("export function setupLayouts(routes)"));
        assert!(code.contains("export function createGetRoutes(router, withLayout = true)"));
    }

    #[test]
    fn test_client_code_snapshot() {
        let options = ResolvedOptions::resolve_with_ssg(UserOptions::default(), false);
        let layouts_dir = Path::new("/app/src/layouts");
        let containers = vec![FileContainer {
            path: "/app/src/layouts".to_string(),
            files: ["admin.vue", "default.vue"]
                .iter()
                .map(|f| LayoutFile::new(layouts_dir, Path::new(f)))
                .collect(),
        }];

        let code = get_client_code(&get_import_code(&containers, &options), &options);
        assert_eq!(
            code,
            r#"const __layout_0_admin = () => import("/app/src/layouts/admin.vue");
import __layout_0_default from "/app/src/layouts/default.vue";

export const layouts = {
  "admin": __layout_0_admin,
  "default": __layout_0_default,
};

const DEFAULT_LAYOUT = "default";

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
"#
        );
    }
}
