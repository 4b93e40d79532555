//! Built-in payment operations: names, agent-facing descriptions, parameter
//! schemas and required actions.

use crate::tools::access::{Actions, Operation, Resource};
use crate::tools::catalog::{Method, ToolEntry};
use crate::tools::schema::{ParamDef, ParamSchema, ParamType};

const CREATE_CUSTOMER: &str = "\
This tool will create a customer in the payments account.

It takes two arguments:
- name (str): The name of the customer.
- email (str, optional): The email of the customer.";

const LIST_CUSTOMERS: &str = "\
This tool will fetch a list of customers from the payments account.

It takes two optional arguments:
- limit (int, optional): The number of customers to return (1-100).
- email (str, optional): A case-sensitive filter on the customer email.";

const CREATE_PRODUCT: &str = "\
This tool will create a product in the payments account.

It takes two arguments:
- name (str): The name of the product.
- description (str, optional): The description of the product.";

const LIST_PRODUCTS: &str = "\
This tool will fetch a list of products from the payments account.

It takes one optional argument:
- limit (int, optional): The number of products to return (1-100).";

const CREATE_PRICE: &str = "\
This tool will create a price for an existing product.

It takes three arguments:
- product (str): The ID of the product to create the price for.
- unit_amount (int): The unit amount of the price in the smallest currency unit.
- currency (str): The three-letter ISO currency code of the price.";

const LIST_PRICES: &str = "\
This tool will fetch a list of prices from the payments account.

It takes two optional arguments:
- product (str, optional): Only return prices for this product.
- limit (int, optional): The number of prices to return (1-100).";

const CREATE_PAYMENT_LINK: &str = "\
This tool will create a payment link for a single price.

It takes two arguments:
- price (str): The ID of the price to sell.
- quantity (int): The quantity of the product to include.";

const CREATE_INVOICE: &str = "\
This tool will create an invoice for a customer.

It takes three arguments:
- customer (str, optional): The ID of the customer. Defaults to the session's customer.
- days_until_due (int, optional): The number of days until the invoice is due.
- items (list, optional): Line items, each with a price (str) and quantity (int, optional).";

const CREATE_INVOICE_ITEM: &str = "\
This tool will add an invoice item to an existing invoice.

It takes three arguments:
- customer (str, optional): The ID of the customer. Defaults to the session's customer.
- price (str): The ID of the price for the item.
- invoice (str): The ID of the invoice to attach the item to.";

const FINALIZE_INVOICE: &str = "\
This tool will finalize a draft invoice so it can be paid.

It takes one argument:
- invoice (str): The ID of the invoice to finalize.";

const RETRIEVE_BALANCE: &str = "\
This tool will retrieve the balance of the payments account.

It takes no input.";

const CREATE_REFUND: &str = "\
This tool will refund a payment intent.

It takes two arguments:
- payment_intent (str): The ID of the payment intent to refund.
- amount (int, optional): The amount to refund in the smallest currency unit. Defaults to the full amount.";

const CANCEL_SUBSCRIPTION: &str = "\
This tool will cancel a subscription immediately.

It takes one argument:
- subscription (str): The ID of the subscription to cancel.";

fn requires(resource: Resource, operation: Operation) -> Actions {
    let mut actions = Actions::new();
    actions.entry(resource).or_default().insert(operation);
    actions
}

fn entry(
    method: Method,
    name: &str,
    description: &str,
    params: Vec<ParamDef>,
    actions: Actions,
) -> ToolEntry {
    ToolEntry {
        method,
        name: name.to_string(),
        description: description.to_string(),
        parameters: ParamSchema::new(params),
        actions,
    }
}

fn list_limit() -> ParamDef {
    ParamDef::optional(
        "limit",
        ParamType::int_between(1, 100),
        "Number of objects to return (1-100)",
    )
}

fn invoice_line_item() -> ParamSchema {
    ParamSchema::new(vec![
        ParamDef::required("price", ParamType::NonEmptyString, "Price ID"),
        ParamDef::optional("quantity", ParamType::int_at_least(1), "Quantity"),
    ])
}

/// Catalog entries in listing order.
pub(crate) fn builtin_entries() -> Vec<ToolEntry> {
    use Operation::{Create, Read, Update};
    use ParamType::NonEmptyString;

    vec![
        entry(
            Method::CreateCustomer,
            "Create Customer",
            CREATE_CUSTOMER,
            vec![
                ParamDef::required("name", NonEmptyString, "Customer name"),
                ParamDef::optional("email", ParamType::String, "Customer email"),
            ],
            requires(Resource::Customers, Create),
        ),
        entry(
            Method::ListCustomers,
            "List Customers",
            LIST_CUSTOMERS,
            vec![
                list_limit(),
                ParamDef::optional("email", ParamType::String, "Filter by email"),
            ],
            requires(Resource::Customers, Read),
        ),
        entry(
            Method::CreateProduct,
            "Create Product",
            CREATE_PRODUCT,
            vec![
                ParamDef::required("name", NonEmptyString, "Product name"),
                ParamDef::optional("description", ParamType::String, "Product description"),
            ],
            requires(Resource::Products, Create),
        ),
        entry(
            Method::ListProducts,
            "List Products",
            LIST_PRODUCTS,
            vec![list_limit()],
            requires(Resource::Products, Read),
        ),
        entry(
            Method::CreatePrice,
            "Create Price",
            CREATE_PRICE,
            vec![
                ParamDef::required("product", NonEmptyString, "Product ID"),
                ParamDef::required(
                    "unit_amount",
                    ParamType::int_at_least(0),
                    "Unit amount in the smallest currency unit",
                ),
                ParamDef::required("currency", ParamType::Currency, "Three-letter ISO currency code"),
            ],
            requires(Resource::Prices, Create),
        ),
        entry(
            Method::ListPrices,
            "List Prices",
            LIST_PRICES,
            vec![
                ParamDef::optional("product", NonEmptyString, "Only prices for this product"),
                list_limit(),
            ],
            requires(Resource::Prices, Read),
        ),
        entry(
            Method::CreatePaymentLink,
            "Create Payment Link",
            CREATE_PAYMENT_LINK,
            vec![
                ParamDef::required("price", NonEmptyString, "Price ID"),
                ParamDef::required("quantity", ParamType::int_at_least(1), "Quantity"),
            ],
            requires(Resource::PaymentLinks, Create),
        ),
        entry(
            Method::CreateInvoice,
            "Create Invoice",
            CREATE_INVOICE,
            vec![
                ParamDef::optional("customer", NonEmptyString, "Customer ID"),
                ParamDef::optional(
                    "days_until_due",
                    ParamType::int_at_least(0),
                    "Days until the invoice is due",
                ),
                ParamDef::optional(
                    "items",
                    ParamType::ObjectList(invoice_line_item()),
                    "Invoice line items",
                ),
            ],
            requires(Resource::Invoices, Create),
        ),
        entry(
            Method::CreateInvoiceItem,
            "Create Invoice Item",
            CREATE_INVOICE_ITEM,
            vec![
                ParamDef::optional("customer", NonEmptyString, "Customer ID"),
                ParamDef::required("price", NonEmptyString, "Price ID"),
                ParamDef::required("invoice", NonEmptyString, "Invoice ID"),
            ],
            requires(Resource::InvoiceItems, Create),
        ),
        entry(
            Method::FinalizeInvoice,
            "Finalize Invoice",
            FINALIZE_INVOICE,
            vec![ParamDef::required("invoice", NonEmptyString, "Invoice ID")],
            requires(Resource::Invoices, Update),
        ),
        entry(
            Method::RetrieveBalance,
            "Retrieve Balance",
            RETRIEVE_BALANCE,
            Vec::new(),
            requires(Resource::Balance, Read),
        ),
        entry(
            Method::CreateRefund,
            "Create Refund",
            CREATE_REFUND,
            vec![
                ParamDef::required("payment_intent", NonEmptyString, "Payment intent ID"),
                ParamDef::optional(
                    "amount",
                    ParamType::int_at_least(0),
                    "Amount to refund in the smallest currency unit",
                ),
            ],
            requires(Resource::Refunds, Create),
        ),
        entry(
            Method::CancelSubscription,
            "Cancel Subscription",
            CANCEL_SUBSCRIPTION,
            vec![ParamDef::required("subscription", NonEmptyString, "Subscription ID")],
            requires(Resource::Subscriptions, Update),
        ),
    ]
}
