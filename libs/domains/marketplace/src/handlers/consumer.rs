//! HTTP handlers for Consumer Products API

listing_handlers! {
    listing: ConsumerProduct,
    tag: "Consumer Products",
    about: "Produce sold by farmers to consumers",
    fields: "All optional: prod_name, seller_name, image, price, prod_size, quantity, available_location (or avalaible_location)",
    removed: "Consumer product removed",
    operations: [
        list_consumer_products,
        list_my_consumer_products,
        create_consumer_product,
        get_consumer_product,
        update_consumer_product,
        delete_consumer_product,
        review_consumer_product,
    ],
}
