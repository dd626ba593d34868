pub mod jolpica;
