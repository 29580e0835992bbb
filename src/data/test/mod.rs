mod audit_log;
mod linked_account;
mod managed_role;
mod mapping_reads;
mod nation_role;
