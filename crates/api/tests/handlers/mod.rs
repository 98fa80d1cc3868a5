mod assignment_test;
mod catalog_test;
mod health_test;
