//! HTTP handlers for Lend Machines API

listing_handlers! {
    listing: LendMachine,
    tag: "Lend Machines",
    about: "Farm equipment offered for lending",
    fields: "Required: name, description, target_plant, price, quantity, machine_power. Optional: image",
    removed: "Machine Removed",
    operations: [
        list_lend_machines,
        list_my_lend_machines,
        create_lend_machine,
        get_lend_machine,
        update_lend_machine,
        delete_lend_machine,
        review_lend_machine,
    ],
}
