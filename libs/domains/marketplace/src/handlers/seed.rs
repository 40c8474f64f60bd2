//! HTTP handlers for Seed Products API

listing_handlers! {
    listing: SeedProduct,
    tag: "Seed Products",
    about: "Seeds sold by suppliers",
    fields: "Required: name, description, category, price, count_in_stock (or countInStock). Optional: image",
    removed: "Product removed",
    operations: [
        list_seed_products,
        list_my_seed_products,
        create_seed_product,
        get_seed_product,
        update_seed_product,
        delete_seed_product,
        review_seed_product,
    ],
}
