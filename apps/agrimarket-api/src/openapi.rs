//! OpenAPI documentation configuration

use utoipa::OpenApi;

/// Combined OpenAPI documentation for all APIs
#[derive(OpenApi)]
#[openapi(
    info(
        title = "AgriMarket API",
        version = "0.1.0",
        description = "Marketplace for consumer products, lend machines and seed products",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    nest(
        (path = "/api/consumer-products", api = domain_marketplace::ConsumerApiDoc),
        (path = "/api/lend-machines", api = domain_marketplace::LendMachineApiDoc),
        (path = "/api/seed-products", api = domain_marketplace::SeedApiDoc)
    ),
    tags(
        (name = "Consumer Products", description = "Produce sold by farmers to consumers"),
        (name = "Lend Machines", description = "Farm equipment offered for lending"),
        (name = "Seed Products", description = "Seeds sold by suppliers")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_category_paths_documented() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        for segment in ["consumer-products", "lend-machines", "seed-products"] {
            for suffix in ["", "/mine", "/{id}", "/{id}/reviews"] {
                let path = format!("/api/{segment}{suffix}");
                assert!(
                    paths.iter().any(|p| **p == path),
                    "missing {path} in {paths:?}"
                );
            }
        }
    }
}
