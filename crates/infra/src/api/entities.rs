//! Table-driven entity operation wrappers
//!
//! Every wrapper is a thin delegation to the generic CRUD and query methods
//! on [`LedgerClient`]; the table at the bottom of this file is the single
//! source of truth for which operations each entity type supports. Entity
//! names are the service's camelCase identifiers; paths lowercase them and
//! response envelopes capitalize them.

use ledgerlink_domain::{Criteria, QueryResult, Result};
use serde_json::Value;

use super::client::{DeleteTarget, LedgerClient};

macro_rules! entity_op {
    (create, $name:ident, $entity:literal) => {
        #[doc = concat!("Create a `", $entity, "` record")]
        pub async fn $name(&self, body: &Value) -> Result<Value> {
            self.create($entity, body).await
        }
    };
    (read, $name:ident, $entity:literal) => {
        #[doc = concat!("Retrieve the `", $entity, "` record with the given id")]
        pub async fn $name(&self, id: &str) -> Result<Value> {
            self.read($entity, id).await
        }
    };
    (update, $name:ident, $entity:literal) => {
        #[doc = concat!("Update the given `", $entity, "` record; the body must carry `Id` and `SyncToken`")]
        pub async fn $name(&self, body: &Value) -> Result<Value> {
            self.update($entity, body).await
        }
    };
    (delete, $name:ident, $entity:literal) => {
        #[doc = concat!("Delete a `", $entity, "` record by id or by full body")]
        pub async fn $name(&self, target: impl Into<DeleteTarget>) -> Result<Value> {
            self.delete($entity, target).await
        }
    };
    (find, $name:ident, $entity:literal) => {
        #[doc = concat!("Find `", $entity, "` records matching the criteria")]
        pub async fn $name(&self, criteria: impl Into<Criteria>) -> Result<QueryResult> {
            self.query($entity, &criteria.into()).await
        }
    };
}

macro_rules! entity_ops {
    ($( $entity:literal { $( $op:ident => $name:ident ),+ $(,)? } )+) => {
        impl LedgerClient {
            $( $( entity_op!($op, $name, $entity); )+ )+
        }
    };
}

entity_ops! {
    "account" {
        create => create_account,
        read => get_account,
        update => update_account,
        find => find_accounts,
    }
    "attachable" {
        create => create_attachable,
        read => get_attachable,
        update => update_attachable,
        delete => delete_attachable,
        find => find_attachables,
    }
    "bill" {
        create => create_bill,
        read => get_bill,
        update => update_bill,
        delete => delete_bill,
        find => find_bills,
    }
    "billPayment" {
        create => create_bill_payment,
        read => get_bill_payment,
        update => update_bill_payment,
        delete => delete_bill_payment,
        find => find_bill_payments,
    }
    "budget" {
        find => find_budgets,
    }
    "class" {
        create => create_class,
        read => get_class,
        update => update_class,
        find => find_classes,
    }
    "companyInfo" {
        read => get_company_info,
        update => update_company_info,
        find => find_company_infos,
    }
    "creditMemo" {
        create => create_credit_memo,
        read => get_credit_memo,
        update => update_credit_memo,
        delete => delete_credit_memo,
        find => find_credit_memos,
    }
    "customer" {
        create => create_customer,
        read => get_customer,
        update => update_customer,
        find => find_customers,
    }
    "department" {
        create => create_department,
        read => get_department,
        update => update_department,
        find => find_departments,
    }
    "employee" {
        create => create_employee,
        read => get_employee,
        update => update_employee,
        find => find_employees,
    }
    "estimate" {
        create => create_estimate,
        read => get_estimate,
        update => update_estimate,
        delete => delete_estimate,
        find => find_estimates,
    }
    "invoice" {
        create => create_invoice,
        read => get_invoice,
        update => update_invoice,
        delete => delete_invoice,
        find => find_invoices,
    }
    "item" {
        create => create_item,
        read => get_item,
        update => update_item,
        find => find_items,
    }
    "journalEntry" {
        create => create_journal_entry,
        read => get_journal_entry,
        update => update_journal_entry,
        delete => delete_journal_entry,
        find => find_journal_entries,
    }
    "payment" {
        create => create_payment,
        read => get_payment,
        update => update_payment,
        delete => delete_payment,
        find => find_payments,
    }
    "paymentMethod" {
        create => create_payment_method,
        read => get_payment_method,
        update => update_payment_method,
        find => find_payment_methods,
    }
    "preferences" {
        read => get_preferences,
        update => update_preferences,
        find => find_preferences,
    }
    "purchase" {
        create => create_purchase,
        read => get_purchase,
        update => update_purchase,
        delete => delete_purchase,
        find => find_purchases,
    }
    "purchaseOrder" {
        create => create_purchase_order,
        read => get_purchase_order,
        update => update_purchase_order,
        delete => delete_purchase_order,
        find => find_purchase_orders,
    }
    "refundReceipt" {
        create => create_refund_receipt,
        read => get_refund_receipt,
        update => update_refund_receipt,
        delete => delete_refund_receipt,
        find => find_refund_receipts,
    }
    "salesReceipt" {
        create => create_sales_receipt,
        read => get_sales_receipt,
        update => update_sales_receipt,
        delete => delete_sales_receipt,
        find => find_sales_receipts,
    }
    "taxAgency" {
        create => create_tax_agency,
        read => get_tax_agency,
        update => update_tax_agency,
        find => find_tax_agencies,
    }
    "taxCode" {
        read => get_tax_code,
        update => update_tax_code,
        find => find_tax_codes,
    }
    "taxRate" {
        read => get_tax_rate,
        update => update_tax_rate,
        find => find_tax_rates,
    }
    "taxService" {
        create => create_tax_service,
        update => update_tax_service,
    }
    "term" {
        create => create_term,
        read => get_term,
        update => update_term,
        find => find_terms,
    }
    "timeActivity" {
        create => create_time_activity,
        read => get_time_activity,
        update => update_time_activity,
        delete => delete_time_activity,
        find => find_time_activities,
    }
    "vendor" {
        create => create_vendor,
        read => get_vendor,
        update => update_vendor,
        find => find_vendors,
    }
    "vendorCredit" {
        create => create_vendor_credit,
        read => get_vendor_credit,
        update => update_vendor_credit,
        delete => delete_vendor_credit,
        find => find_vendor_credits,
    }
}
