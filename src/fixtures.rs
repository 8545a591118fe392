#[cfg(test)]
pub mod test {
    //! A small but complete template/user pair exercising every line shape:
    //! value, boolean, quoted list, options, the homing block, doc blocks.
    //! The user file is a previously saved configuration, so its substituted
    //! lines are in the writer's canonical format and a no-edit round trip
    //! reproduces it byte for byte.

    pub const GENERIC_TEMPLATE: &str = r#"// Generic printer configuration.
// Values here are examples; the saved user file overrides them.

/** \def MOTHERBOARD
  The electronics board this firmware runs on.
*/
#define MOTHERBOARD GEN7

/** \def BAUD BAUD_HALF_DUPLEX
  Communication speed of the serial link, and whether the
  wire pair is shared between both directions.

  Known-good values:
    - 9600
    - 115200
*/
#define BAUD 115200
//#define BAUD_HALF_DUPLEX

/** \def USB_SERIAL
  Enable when the serial port is a native USB device.
*/
#define USB_SERIAL

/** \def GREETING
  Strings shown on the display at boot, one per line.
*/
#define GREETING "hello" "printer" "!"

/** \def CANNED_CYCLE
  Raw G-code run after homing. The authoritative value lives in
  the metadata file; this line is carried through unchanged.
*/
#define CANNED_CYCLE "G28 X0 Y0"

HOMING_OPTION(x_min)
HOMING_OPTION(y_min)
HOMING_OPTION(z_min)
HOMING_OPTION(none)

// DEFINE_HOMING start
DEFINE_HOMING(x_min, y_min, z_min, none)
// DEFINE_HOMING end
"#;

    pub const USER_CONFIG: &str = r#"// Generic printer configuration.
// Values here are examples; the saved user file overrides them.

/** \def MOTHERBOARD
  The electronics board this firmware runs on.
*/
#define MOTHERBOARD GEN7

/** \def BAUD BAUD_HALF_DUPLEX
  Communication speed of the serial link, and whether the
  wire pair is shared between both directions.

  Known-good values:
    - 9600
    - 115200
*/
#define BAUD 57600
//#define BAUD_HALF_DUPLEX

/** \def USB_SERIAL
  Enable when the serial port is a native USB device.
*/
#define USB_SERIAL

/** \def GREETING
  Strings shown on the display at boot, one per line.
*/
#define GREETING "hi"

/** \def CANNED_CYCLE
  Raw G-code run after homing. The authoritative value lives in
  the metadata file; this line is carried through unchanged.
*/
#define CANNED_CYCLE "G28 X0 Y0"

HOMING_OPTION(x_min)
HOMING_OPTION(y_min)
HOMING_OPTION(z_min)
HOMING_OPTION(none)

// DEFINE_HOMING start
DEFINE_HOMING(z_min, y_min, x_min, none)
// DEFINE_HOMING end
"#;

    pub fn template_lines() -> Vec<String> {
        GENERIC_TEMPLATE.lines().map(str::to_string).collect()
    }

    pub fn user_lines() -> Vec<String> {
        USER_CONFIG.lines().map(str::to_string).collect()
    }
}
